//! Background thread that owns the `Store`.
//!
//! The UI never blocks on SQLite: screens queue `Request`s, the event loop
//! forwards them here, and results come back as `Response`s that the loop
//! drains between input polls. `execute` is the same logic run inline, which
//! is what the tests drive.

use std::collections::BTreeSet;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::model::{
    COMPLETE_TAG, Comment, Project, ProjectId, Tag, TagId, Task, TaskFields, TaskId,
};
use crate::store::{LAST_PROJECT_KEY, Store, StoreResult};

/// Stamp on task-list and comment loads; larger is newer
pub type Generation = u64;

/// What the task list should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskQuery {
    pub project_id: ProjectId,
    pub search: String,
    pub tag_id: Option<TagId>,
    /// Show only completed tasks instead of hiding them
    pub showing_completed: bool,
}

/// A loaded task list plus the id of the "complete" tag it was filtered with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPage {
    pub tasks: Vec<Task>,
    pub completed_tag: Option<TagId>,
}

/// A task write from the edit form. `task_id` is None for a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSave {
    pub project_id: ProjectId,
    pub task_id: Option<TaskId>,
    pub fields: TaskFields,
    pub tags: BTreeSet<TagId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    LoadProjects,
    CreateProject {
        title: String,
        description: String,
    },
    UpdateProject {
        id: ProjectId,
        title: String,
        description: String,
    },
    DeleteProject {
        id: ProjectId,
    },
    /// Resolve the `last_project_id` setting to a project
    LoadLastProject,
    SetLastProject(Option<ProjectId>),
    LoadTags,
    LoadTasks {
        generation: Generation,
        query: TaskQuery,
    },
    SaveTask(TaskSave),
    DeleteTask {
        id: TaskId,
    },
    /// Immediate tag toggle from the assign-tags panel
    SetTaskTag {
        task_id: TaskId,
        tag_id: TagId,
        on: bool,
    },
    LoadComments {
        generation: Generation,
        task_id: TaskId,
    },
    AddComment {
        task_id: TaskId,
        content: String,
    },
}

#[derive(Debug)]
pub enum Response {
    ProjectsLoaded(StoreResult<Vec<Project>>),
    ProjectCreated(StoreResult<Project>),
    ProjectUpdated(StoreResult<()>),
    ProjectDeleted(StoreResult<()>),
    LastProject(StoreResult<Option<Project>>),
    SettingSaved(StoreResult<()>),
    TagsLoaded(StoreResult<Vec<Tag>>),
    TasksLoaded {
        project_id: ProjectId,
        generation: Generation,
        result: StoreResult<TaskPage>,
    },
    TaskSaved(StoreResult<TaskId>),
    TaskDeleted(StoreResult<()>),
    TaskTagSet(StoreResult<()>),
    CommentsLoaded {
        generation: Generation,
        task_id: TaskId,
        result: StoreResult<Vec<Comment>>,
    },
    CommentAdded(StoreResult<Comment>),
}

/// Run one request against the store
pub fn execute(store: &Store, request: Request) -> Response {
    match request {
        Request::LoadProjects => Response::ProjectsLoaded(store.list_projects()),
        Request::CreateProject { title, description } => {
            Response::ProjectCreated(store.create_project(&title, &description))
        }
        Request::UpdateProject {
            id,
            title,
            description,
        } => Response::ProjectUpdated(store.update_project(id, &title, &description)),
        Request::DeleteProject { id } => Response::ProjectDeleted(store.delete_project(id)),
        Request::LoadLastProject => Response::LastProject(last_project(store)),
        Request::SetLastProject(id) => Response::SettingSaved(match id {
            Some(id) => store.set_setting(LAST_PROJECT_KEY, &id.to_string()),
            None => store.clear_setting(LAST_PROJECT_KEY),
        }),
        Request::LoadTags => Response::TagsLoaded(store.list_tags()),
        Request::LoadTasks { generation, query } => Response::TasksLoaded {
            project_id: query.project_id,
            generation,
            result: load_tasks(store, &query),
        },
        Request::SaveTask(save) => Response::TaskSaved(save_task(store, &save)),
        Request::DeleteTask { id } => Response::TaskDeleted(store.delete_task(id)),
        Request::SetTaskTag {
            task_id,
            tag_id,
            on,
        } => Response::TaskTagSet(if on {
            store.add_tag_to_task(task_id, tag_id)
        } else {
            store.remove_tag_from_task(task_id, tag_id)
        }),
        Request::LoadComments {
            generation,
            task_id,
        } => Response::CommentsLoaded {
            generation,
            task_id,
            result: store.task_comments(task_id),
        },
        Request::AddComment { task_id, content } => {
            Response::CommentAdded(store.create_comment(task_id, &content))
        }
    }
}

fn last_project(store: &Store) -> StoreResult<Option<Project>> {
    let Some(value) = store.setting(LAST_PROJECT_KEY)? else {
        return Ok(None);
    };
    match value.parse::<ProjectId>() {
        Ok(id) => store.find_project(id),
        Err(_) => {
            tracing::warn!(value = %value, "ignoring malformed last project setting");
            Ok(None)
        }
    }
}

fn load_tasks(store: &Store, query: &TaskQuery) -> StoreResult<TaskPage> {
    let completed_tag = store.tag_by_name(COMPLETE_TAG)?.map(|t| t.id);
    let tasks = if query.showing_completed {
        match completed_tag {
            Some(id) => store.list_tasks_filtered(query.project_id, &query.search, Some(id), None)?,
            None => Vec::new(),
        }
    } else {
        store.list_tasks_filtered(query.project_id, &query.search, query.tag_id, completed_tag)?
    };
    Ok(TaskPage {
        tasks,
        completed_tag,
    })
}

fn save_task(store: &Store, save: &TaskSave) -> StoreResult<TaskId> {
    let (id, sync) = store.save_task(save.project_id, save.task_id, &save.fields, &save.tags)?;
    tracing::debug!(
        id,
        added = sync.added.len(),
        removed = sync.removed.len(),
        "saved task"
    );
    Ok(id)
}

/// Handle to the worker thread
pub struct Worker {
    requests: Option<Sender<Request>>,
    responses: Receiver<Response>,
    handle: Option<JoinHandle<()>>,
    in_flight: usize,
}

impl Worker {
    pub fn spawn(store: Store) -> std::io::Result<Self> {
        let (req_tx, req_rx) = mpsc::channel::<Request>();
        let (resp_tx, resp_rx) = mpsc::channel::<Response>();
        let handle = thread::Builder::new()
            .name("stm-store".into())
            .spawn(move || {
                for request in req_rx {
                    tracing::trace!(?request, "worker request");
                    if resp_tx.send(execute(&store, request)).is_err() {
                        break;
                    }
                }
                tracing::debug!("store worker exiting");
            })?;
        Ok(Worker {
            requests: Some(req_tx),
            responses: resp_rx,
            handle: Some(handle),
            in_flight: 0,
        })
    }

    pub fn send(&mut self, request: Request) {
        let sent = self
            .requests
            .as_ref()
            .is_some_and(|tx| tx.send(request).is_ok());
        if sent {
            self.in_flight += 1;
        } else {
            tracing::error!("store worker is gone; request dropped");
        }
    }

    pub fn try_recv(&mut self) -> Option<Response> {
        let response = self.responses.try_recv().ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(response)
    }

    /// Wait up to `timeout` for the next response
    pub fn recv_timeout(&mut self, timeout: Duration) -> Option<Response> {
        match self.responses.recv_timeout(timeout) {
            Ok(response) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                Some(response)
            }
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Requests sent whose responses have not been received yet
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

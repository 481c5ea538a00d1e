use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::select::CreateRequest;
use crate::error::CreateError;
use crate::host::{OpenOptions, Resource, ResourceCreator};

/// Outcome of a detached creation, delivered back to the event loop.
#[derive(Debug)]
pub enum CreationEvent {
    Created {
        resource: Resource,
        open: OpenOptions,
    },
    Failed {
        label: String,
        error: CreateError,
    },
}

/// Create the requested note on a detached thread.
///
/// There is no join point and no lock: two sessions creating the same name
/// race, and the loser reports `AlreadyExists`.
pub fn spawn_creation<F>(
    creator: Arc<dyn ResourceCreator>,
    request: CreateRequest,
    report: F,
) -> JoinHandle<()>
where
    F: FnOnce(CreationEvent) + Send + 'static,
{
    thread::spawn(move || {
        let event = match creator.create(&request.folder, &request.label) {
            Ok(resource) => CreationEvent::Created {
                resource,
                open: request.open,
            },
            Err(error) => {
                tracing::error!("failed to create person `{}`: {error}", request.label);
                CreationEvent::Failed {
                    label: request.label,
                    error,
                }
            }
        };
        report(event);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    struct AlwaysFails;

    impl ResourceCreator for AlwaysFails {
        fn create(&self, _folder: &str, name: &str) -> Result<Resource, CreateError> {
            Err(CreateError::AlreadyExists(format!("/v/{name}.md").into()))
        }
    }

    struct InMemory;

    impl ResourceCreator for InMemory {
        fn create(&self, folder: &str, name: &str) -> Result<Resource, CreateError> {
            Ok(Resource::new(format!("/v/{folder}/{name}.md")))
        }
    }

    fn request(label: &str) -> CreateRequest {
        CreateRequest {
            folder: "People".to_string(),
            label: label.to_string(),
            open: OpenOptions::new_person(false),
        }
    }

    #[test]
    fn success_is_reported_with_open_options() {
        let (tx, rx) = mpsc::channel();
        spawn_creation(Arc::new(InMemory), request("Zoe"), move |event| {
            let _ = tx.send(event);
        })
        .join()
        .unwrap();

        match rx.recv().unwrap() {
            CreationEvent::Created { resource, open } => {
                assert_eq!(resource.stem(), "Zoe");
                assert_eq!(open, OpenOptions::new_person(false));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn failure_is_reported_not_raised() {
        let (tx, rx) = mpsc::channel();
        spawn_creation(Arc::new(AlwaysFails), request("Bob"), move |event| {
            let _ = tx.send(event);
        })
        .join()
        .unwrap();

        assert!(matches!(
            rx.recv().unwrap(),
            CreationEvent::Failed { label, error: CreateError::AlreadyExists(_) } if label == "Bob"
        ));
    }
}

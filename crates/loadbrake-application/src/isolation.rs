//! Panic isolation for collaborator futures
//!
//! Collectors, extensions, engine controls and threshold sources are
//! supplied by the host. A panic inside one of them must end up as a logged
//! failure, not an unwound supervision task.

use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

/// Await `future`, converting a panic into `Err(message)`
pub(crate) async fn catch_panic<F>(future: F) -> Result<F::Output, String>
where
    F: Future,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|payload| panic_message(payload.as_ref()))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

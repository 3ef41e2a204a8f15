use crate::server::ServerRouter;
use dennicek_common::model::Id;
use serde::Serialize;

mod posts;
mod recordings;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .merge(posts::routes())
        .merge(recordings::routes())
}

/// Reply to a successful create.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Serialize)]
#[serde(bound = "")]
struct Created<Marker> {
    message: &'static str,
    id: Id<Marker>,
}

use bevy::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Token shared between the running scene and the work it started.
///
/// Teardown flips it, so a request that resolves afterwards sees a dead
/// scene and drops its result instead of writing into the next one.
#[derive(Resource, Debug, Clone)]
pub struct SceneLiveness(Arc<AtomicBool>);

impl Default for SceneLiveness {
    fn default() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }
}

impl SceneLiveness {
    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn revoke(&self) {
        self.0.store(false, Ordering::Release);
    }
}

use serde::Serialize;

/// Liveness payload returned by `GET /health` on every service.
#[derive(Serialize, Debug, Clone, Copy)]
pub struct Health {
    pub status: &'static str,
    pub service: &'static str,
}

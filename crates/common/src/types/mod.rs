use serde::Serialize;

/// Body of `GET /health`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Health {
    pub status: &'static str,
    pub database: &'static str,
}

impl Health {
    pub fn up() -> Self { Self { status: "UP", database: "UP" } }

    pub fn database_down() -> Self { Self { status: "DOWN", database: "DOWN" } }
}

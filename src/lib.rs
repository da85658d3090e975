//! A small photo-voting service: create a project, upload photos, collect
//! per-photo up/down votes, and rank the results.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub mod models {
    pub mod photo;
    pub mod session;
    pub mod vote;
}

pub mod repositories {
    pub mod session;
}

pub mod services {
    pub mod results;
    pub mod sessions;
    pub mod uploads;
    pub mod votes;
}

pub mod handlers {
    pub mod response;
    pub mod results;
    pub mod sessions;
    pub mod uploads;
    pub mod votes;
}

pub mod validation {
    pub mod upload;
}

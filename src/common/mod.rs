pub mod client {
    pub mod models {
        pub mod chapter;
        pub mod common;
        pub mod manga;
    }
    pub mod client;
    pub mod error;
    pub mod source;
}

pub mod logger;
pub mod models;

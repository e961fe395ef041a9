// Project workspaces: uploaded job titles and descriptions persisted on disk.

pub mod handlers;
pub mod storage;

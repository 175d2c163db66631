pub mod board;
pub mod path;

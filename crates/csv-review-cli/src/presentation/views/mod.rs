pub mod row;

pub use row::{CommentView, RowView};

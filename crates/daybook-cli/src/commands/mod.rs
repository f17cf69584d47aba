pub mod add;
pub mod conflicts;
pub mod delete;
pub mod done;
pub mod edit;
pub mod focus;
pub mod group;
pub mod list;
pub mod r#move;
pub mod remind;
pub mod tags;

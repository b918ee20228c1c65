pub mod message_row;
pub mod sidebar;

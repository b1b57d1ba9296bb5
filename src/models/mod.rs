pub mod page;
pub mod setting_record;

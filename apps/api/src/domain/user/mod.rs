// User domain module
// Admin accounts that sign in and upload contact lists

pub mod value_objects;

pub use value_objects::Email;

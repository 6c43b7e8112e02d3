/// Pass module - render passes and their attachments

pub mod render_pass;

pub use render_pass::*;

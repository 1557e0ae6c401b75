pub mod use_feedback;

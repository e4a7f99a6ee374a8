pub mod feedbacks;
pub mod foods;
pub mod orders;
pub mod session;
pub mod users;

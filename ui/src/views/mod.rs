mod about;
pub use about::About;

mod dashboard;
pub use dashboard::Dashboard;

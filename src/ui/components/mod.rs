mod button;

pub use button::ActionButton;

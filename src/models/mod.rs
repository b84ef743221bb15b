pub mod cart;
pub mod convention;
pub mod event;
pub mod registration;
pub mod sponsor;
pub mod ticket;
pub mod user;

pub use cart::{Cart, CartItem};
pub use convention::{Convention, EventType};
pub use event::Event;
pub use registration::{Registration, RegistrationUpdate};
pub use sponsor::Sponsor;
pub use ticket::{Sellable, Ticket, TicketOption};
pub use user::{Group, User};

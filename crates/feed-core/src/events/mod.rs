mod domain_event;

pub use domain_event::{
    CommentCreatedEvent, CommentDeletedEvent, DomainEvent, PostCreatedEvent, PostDeletedEvent,
    ReactionToggledEvent, UserCreatedEvent, UserUpdatedEvent,
};

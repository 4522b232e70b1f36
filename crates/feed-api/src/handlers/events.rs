//! Live event streams (Server-Sent Events)
//!
//! Every stream reads from the process-wide pub/sub subscriber and keeps
//! only the events of its own channel. Observers are passive: a client that
//! falls behind is told how many events it missed and should refetch.

use std::convert::Infallible;

use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
};
use feed_cache::{FeedChannel, ReceivedEvent};
use feed_service::PostService;
use tokio::sync::broadcast;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, warn};

use crate::extractors::PostPath;
use crate::response::ApiResult;
use crate::state::AppState;

/// GET /feed/events
pub async fn feed_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("Feed event stream opened");
    channel_stream(state.subscriber().receiver(), FeedChannel::Feed)
}

/// GET /posts/{post_id}/events
pub async fn post_events(
    State(state): State<AppState>,
    Path(path): Path<PostPath>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let post_id = path.post_id()?;

    // 404 for posts that do not exist instead of an empty stream
    PostService::new(state.service_context())
        .get_post(post_id, None)
        .await?;

    debug!(post_id = %post_id, "Post event stream opened");
    Ok(channel_stream(
        state.subscriber().receiver(),
        FeedChannel::post(post_id),
    ))
}

fn channel_stream(
    receiver: broadcast::Receiver<ReceivedEvent>,
    channel: FeedChannel,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(receiver)
        .filter_map(move |message| for_channel(message, channel))
        .map(Ok);

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn for_channel(
    message: Result<ReceivedEvent, BroadcastStreamRecvError>,
    channel: FeedChannel,
) -> Option<Event> {
    match message {
        Ok(received) if received.channel == channel => to_sse(&received),
        Ok(_) => None,
        Err(BroadcastStreamRecvError::Lagged(missed)) => {
            warn!(channel = %channel, missed, "Event stream lagged");
            Some(Event::default().event("LAGGED").data(missed.to_string()))
        }
    }
}

fn to_sse(received: &ReceivedEvent) -> Option<Event> {
    let event = received.event.as_ref();
    match Event::default().event(event.event_type()).json_data(event) {
        Ok(sse) => Some(sse),
        Err(e) => {
            warn!(error = %e, "Failed to encode event");
            None
        }
    }
}

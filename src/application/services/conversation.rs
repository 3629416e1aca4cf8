//! Conversation Aggregation
//!
//! Derives per-counterpart conversation summaries from a user's raw
//! messages. Summaries are a pure projection: recomputed on every read,
//! never stored.

use chrono::{DateTime, Utc};

use crate::domain::MessageRecord;

/// One row per distinct (counterpart, listing) pair, carrying the most
/// recent message of that conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationSummary {
    pub listing_id: i64,
    pub listing_name: String,
    pub counterpart_id: i64,
    pub counterpart_name: String,
    pub last_message: String,
    pub timestamp: DateTime<Utc>,
}

/// Group `messages` by (counterpart, listing) and emit one summary per
/// group, represented by the message with the greatest timestamp.
///
/// Equal timestamps are broken by message id (higher id wins, i.e.
/// insertion order), so repeated calls on the same data are
/// deterministic. Output is sorted newest-first, ties again by id
/// descending. A user with no messages yields an empty vec.
pub fn summarize_conversations(
    user_id: i64,
    messages: &[MessageRecord],
) -> Vec<ConversationSummary> {
    let mut latest: std::collections::HashMap<(i64, i64), &MessageRecord> =
        std::collections::HashMap::new();

    for message in messages {
        let key = (message.counterpart_id(user_id), message.listing_id);
        match latest.get(&key) {
            Some(current)
                if (current.created_at, current.id) >= (message.created_at, message.id) => {}
            _ => {
                latest.insert(key, message);
            }
        }
    }

    let mut summaries: Vec<ConversationSummary> = latest
        .into_values()
        .map(|message| ConversationSummary {
            listing_id: message.listing_id,
            listing_name: message.listing_name.clone(),
            counterpart_id: message.counterpart_id(user_id),
            counterpart_name: message.counterpart_name(user_id).to_string(),
            last_message: message.content.clone(),
            timestamp: message.created_at,
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| (b.counterpart_id, b.listing_id).cmp(&(a.counterpart_id, a.listing_id)))
    });

    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn record(
        id: i64,
        sender_id: i64,
        receiver_id: i64,
        listing_id: i64,
        content: &str,
        ts: i64,
    ) -> MessageRecord {
        MessageRecord {
            id,
            sender_id,
            sender_name: format!("user-{}", sender_id),
            sender_avatar_url: None,
            receiver_id,
            receiver_name: format!("user-{}", receiver_id),
            listing_id,
            listing_name: format!("listing-{}", listing_id),
            content: content.into(),
            is_read: false,
            created_at: Utc.timestamp_opt(ts, 0).unwrap(),
        }
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(summarize_conversations(1, &[]), vec![]);
    }

    #[test]
    fn one_summary_per_counterpart_listing_pair() {
        let messages = vec![
            record(1, 1, 2, 42, "first to bob about rex", 100),
            record(2, 2, 1, 42, "bob replies about rex", 200),
            record(3, 1, 2, 43, "to bob about milo", 150),
            record(4, 3, 1, 42, "carol about rex", 180),
        ];

        let summaries = summarize_conversations(1, &messages);

        // 3 distinct (counterpart, listing) pairs: (2,42), (2,43), (3,42)
        assert_eq!(summaries.len(), 3);
    }

    #[test]
    fn representative_is_max_timestamp_in_group() {
        let messages = vec![
            record(1, 1, 2, 42, "older", 100),
            record(2, 2, 1, 42, "newest", 300),
            record(3, 1, 2, 42, "middle", 200),
        ];

        let summaries = summarize_conversations(1, &messages);

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].last_message, "newest");
        assert_eq!(summaries[0].counterpart_id, 2);
    }

    #[test]
    fn equal_timestamps_break_by_id() {
        let messages = vec![
            record(7, 1, 2, 42, "written first", 100),
            record(8, 2, 1, 42, "written second", 100),
        ];

        let summaries = summarize_conversations(1, &messages);

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].last_message, "written second");

        // Same result regardless of input order
        let reversed: Vec<_> = messages.into_iter().rev().collect();
        let again = summarize_conversations(1, &reversed);
        assert_eq!(summaries, again);
    }

    #[test]
    fn counterpart_perspective_follows_requesting_user() {
        let messages = vec![record(1, 1, 2, 42, "hello", 100)];

        let for_sender = summarize_conversations(1, &messages);
        assert_eq!(for_sender[0].counterpart_id, 2);

        let for_receiver = summarize_conversations(2, &messages);
        assert_eq!(for_receiver[0].counterpart_id, 1);
    }

    #[test]
    fn output_is_sorted_newest_first() {
        let messages = vec![
            record(1, 1, 2, 42, "old thread", 100),
            record(2, 1, 3, 42, "new thread", 300),
            record(3, 1, 2, 43, "middle thread", 200),
        ];

        let summaries = summarize_conversations(1, &messages);
        let timestamps: Vec<_> = summaries.iter().map(|s| s.timestamp.timestamp()).collect();
        assert_eq!(timestamps, vec![300, 200, 100]);
    }
}

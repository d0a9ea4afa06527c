//! Ticket id generation.
//!
//! Ids look like `tkt_<ms base36>_<random base36>`. The timestamp prefix keeps
//! ids roughly sortable by creation; uniqueness comes from the 64-bit random
//! suffix.

use crate::model::ticket::TicketId;
use rand::Rng;

const ID_PREFIX: &str = "tkt";

/// Builds a new id from a creation timestamp and a random source.
pub fn generate_ticket_id<R: Rng + ?Sized>(now_ms: i64, rng: &mut R) -> TicketId {
    let timestamp = u64::try_from(now_ms).unwrap_or(0);
    let suffix: u64 = rng.gen();
    TicketId::new(format!(
        "{ID_PREFIX}_{}_{}",
        to_base36(timestamp),
        to_base36(suffix)
    ))
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }

    let mut buf = Vec::with_capacity(13);
    while value > 0 {
        buf.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    buf.reverse();
    buf.into_iter().map(char::from).collect()
}

#[cfg(test)]
mod tests {
    use super::{generate_ticket_id, to_base36};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn base36_encodes_known_values() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(u64::MAX), "3w5e11264sgsf");
    }

    #[test]
    fn id_has_prefix_timestamp_and_suffix() {
        let mut rng = StdRng::seed_from_u64(7);
        let id = generate_ticket_id(1_700_000_000_000, &mut rng);
        let parts: Vec<&str> = id.as_str().split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "tkt");
        assert_eq!(parts[1], to_base36(1_700_000_000_000));
        assert!(!parts[2].is_empty());
        assert_eq!(id.display_code(), parts[1]);
    }

    #[test]
    fn ids_from_the_same_millisecond_do_not_collide() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            assert!(seen.insert(generate_ticket_id(1_000, &mut rng)));
        }
    }
}

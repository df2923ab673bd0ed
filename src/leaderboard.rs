// Leaderboard - cross-center ranking by total recorded points

use crate::entities::User;

/// Visual tier for the top three ranks. Purely presentational.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Gold,
    Silver,
    Bronze,
}

impl Tier {
    pub fn from_rank(rank: usize) -> Option<Tier> {
        match rank {
            1 => Some(Tier::Gold),
            2 => Some(Tier::Silver),
            3 => Some(Tier::Bronze),
            _ => None,
        }
    }
}

/// One ranked row: 1-indexed rank, center name, and summed points.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub tier: Option<Tier>,
    pub center_name: String,
    /// Whether this row is the acting center.
    pub is_you: bool,
    pub points: f64,
}

/// Rank every registered center by total recorded points, descending.
///
/// Totals are sums of stored per-transaction points (already rounded at
/// recording time and defensively coerced at load). A center with no
/// transactions ranks with 0 points rather than being excluded. Ties keep
/// registration order; the sort is stable. An empty collection yields an
/// empty board, not an error.
pub fn rank_centers(users: &[User], current_email: Option<&str>) -> Vec<LeaderboardEntry> {
    let mut totals: Vec<(&User, f64)> = users.iter().map(|u| (u, u.total_points())).collect();

    totals.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    totals
        .into_iter()
        .enumerate()
        .map(|(index, (user, points))| {
            let rank = index + 1;
            LeaderboardEntry {
                rank,
                tier: Tier::from_rank(rank),
                center_name: user.center_name.clone(),
                is_you: current_email.is_some_and(|email| email == user.email),
                points,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{BatchItem, Transaction};
    use crate::rates::MaterialKind;
    use chrono::{DateTime, Utc};

    fn at() -> DateTime<Utc> {
        "2024-06-01T12:00:00Z".parse().unwrap()
    }

    fn center(name: &str, email: &str, glass_kgs: &[f64]) -> User {
        let mut user = User::new(
            name.to_string(),
            "addr".to_string(),
            email.to_string(),
            "hash".to_string(),
            at(),
        );
        for &kg in glass_kgs {
            let tx =
                Transaction::from_batch(&[BatchItem::new(MaterialKind::Glass, kg)], at()).unwrap();
            user.push_transaction(tx);
        }
        user
    }

    #[test]
    fn test_empty_collection_yields_empty_board() {
        assert!(rank_centers(&[], None).is_empty());
    }

    #[test]
    fn test_descending_order_with_tiers() {
        let users = vec![
            center("Low", "low@example.com", &[4.0]),    // 1.0 pts
            center("High", "high@example.com", &[40.0]), // 10.0 pts
            center("Mid", "mid@example.com", &[20.0]),   // 5.0 pts
            center("None", "none@example.com", &[]),     // 0 pts
        ];

        let board = rank_centers(&users, None);
        let names: Vec<_> = board.iter().map(|e| e.center_name.as_str()).collect();
        assert_eq!(names, ["High", "Mid", "Low", "None"]);

        assert_eq!(board[0].rank, 1);
        assert_eq!(board[0].tier, Some(Tier::Gold));
        assert_eq!(board[1].tier, Some(Tier::Silver));
        assert_eq!(board[2].tier, Some(Tier::Bronze));
        assert_eq!(board[3].tier, None);
        assert_eq!(board[3].rank, 4);
    }

    #[test]
    fn test_totals_sum_each_centers_transactions() {
        let users = vec![center("Multi", "multi@example.com", &[4.0, 8.0, 12.0])];
        let board = rank_centers(&users, None);
        // glass at 0.25/kg: 1.0 + 2.0 + 3.0
        assert!((board[0].points - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_transaction_center_is_included() {
        let users = vec![center("Empty", "empty@example.com", &[])];
        let board = rank_centers(&users, None);
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].points, 0.0);
        assert_eq!(board[0].rank, 1);
    }

    #[test]
    fn test_ties_keep_registration_order() {
        let users = vec![
            center("First", "first@example.com", &[4.0]),
            center("Second", "second@example.com", &[4.0]),
        ];

        let board = rank_centers(&users, None);
        assert_eq!(board[0].center_name, "First");
        assert_eq!(board[1].center_name, "Second");
    }

    #[test]
    fn test_current_center_is_flagged() {
        let users = vec![
            center("A", "a@example.com", &[]),
            center("B", "b@example.com", &[]),
        ];

        let board = rank_centers(&users, Some("b@example.com"));
        assert!(!board[0].is_you);
        assert!(board[1].is_you);

        let anonymous = rank_centers(&users, None);
        assert!(anonymous.iter().all(|e| !e.is_you));
    }
}

pub mod catalog;
pub mod handlers;

/// Points granted to every new account.
pub const SIGNUP_POINTS: i32 = 100;
pub const POINTS_PER_LEVEL: i32 = 500;

pub fn level_for_points(points: i32) -> i32 {
    points.max(0) / POINTS_PER_LEVEL + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_boundaries() {
        assert_eq!(level_for_points(0), 1);
        assert_eq!(level_for_points(SIGNUP_POINTS), 1);
        assert_eq!(level_for_points(499), 1);
        assert_eq!(level_for_points(500), 2);
        assert_eq!(level_for_points(1250), 3);
        assert_eq!(level_for_points(-20), 1);
    }
}

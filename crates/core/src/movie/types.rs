//! Movie and session domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::MovieError;

/// Bounds for a movie's age restriction (inclusive).
const AGE_RESTRICTION_MIN: i32 = 0;
const AGE_RESTRICTION_MAX: i32 = 21;

/// One of the seven fixed 2-hour exhibition windows spanning 10:00-00:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeslot {
    /// 10:00-12:00
    #[serde(rename = "10:00-12:00")]
    Morning,
    /// 12:00-14:00
    #[serde(rename = "12:00-14:00")]
    Noon,
    /// 14:00-16:00
    #[serde(rename = "14:00-16:00")]
    Afternoon,
    /// 16:00-18:00
    #[serde(rename = "16:00-18:00")]
    Evening,
    /// 18:00-20:00
    #[serde(rename = "18:00-20:00")]
    EveningPrime,
    /// 20:00-22:00
    #[serde(rename = "20:00-22:00")]
    Night,
    /// 22:00-00:00
    #[serde(rename = "22:00-00:00")]
    LateNight,
}

impl Timeslot {
    /// All timeslots, in exhibition order.
    pub const ALL: [Self; 7] = [
        Self::Morning,
        Self::Noon,
        Self::Afternoon,
        Self::Evening,
        Self::EveningPrime,
        Self::Night,
        Self::LateNight,
    ];

    /// Returns the wire representation (`"18:00-20:00"` etc.).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "10:00-12:00",
            Self::Noon => "12:00-14:00",
            Self::Afternoon => "14:00-16:00",
            Self::Evening => "16:00-18:00",
            Self::EveningPrime => "18:00-20:00",
            Self::Night => "20:00-22:00",
            Self::LateNight => "22:00-00:00",
        }
    }
}

impl std::str::FromStr for Timeslot {
    type Err = MovieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|slot| slot.as_str() == s)
            .ok_or_else(|| MovieError::InvalidTimeslot(s.to_string()))
    }
}

impl std::fmt::Display for Timeslot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A movie in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    /// Movie ID.
    pub id: Uuid,
    /// Unique title.
    pub title: String,
    /// Minimum viewer age (0-21 inclusive).
    pub age_restriction: i32,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Last update instant.
    pub updated_at: DateTime<Utc>,
}

impl Movie {
    /// Creates a new movie, validating its invariants.
    ///
    /// # Errors
    ///
    /// Returns `MovieError::EmptyTitle` or
    /// `MovieError::AgeRestrictionOutOfRange`.
    pub fn new(title: &str, age_restriction: i32) -> Result<Self, MovieError> {
        let now = Utc::now();
        Self::build(Uuid::new_v4(), title, age_restriction, now, now)
    }

    /// Rebuilds an existing movie with new field values, re-running the
    /// invariant checks. The ID and creation instant are preserved.
    ///
    /// # Errors
    ///
    /// Same as [`Movie::new`].
    pub fn with_id(
        id: Uuid,
        title: &str,
        age_restriction: i32,
        created_at: DateTime<Utc>,
    ) -> Result<Self, MovieError> {
        Self::build(id, title, age_restriction, created_at, Utc::now())
    }

    fn build(
        id: Uuid,
        title: &str,
        age_restriction: i32,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, MovieError> {
        if title.trim().is_empty() {
            return Err(MovieError::EmptyTitle);
        }
        if !(AGE_RESTRICTION_MIN..=AGE_RESTRICTION_MAX).contains(&age_restriction) {
            return Err(MovieError::AgeRestrictionOutOfRange(age_restriction));
        }

        Ok(Self {
            id,
            title: title.to_string(),
            age_restriction,
            created_at,
            updated_at,
        })
    }
}

/// A scheduled screening of a movie in a room at a date and timeslot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieSession {
    /// Session ID.
    pub id: Uuid,
    /// Owning movie.
    pub movie_id: Uuid,
    /// Exhibition date (must be in the future at creation time).
    pub date: DateTime<Utc>,
    /// Exhibition window.
    pub timeslot: Timeslot,
    /// Room number (positive).
    pub room_number: i32,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Last update instant.
    pub updated_at: DateTime<Utc>,
}

impl MovieSession {
    /// Creates a new session, validating its invariants. The timeslot is
    /// parsed from its wire form, rejecting anything outside the fixed grid.
    ///
    /// # Errors
    ///
    /// Returns `MovieError::PastSessionDate`,
    /// `MovieError::NonPositiveRoomNumber`, or `MovieError::InvalidTimeslot`.
    pub fn new(
        movie_id: Uuid,
        date: DateTime<Utc>,
        timeslot: &str,
        room_number: i32,
    ) -> Result<Self, MovieError> {
        let now = Utc::now();
        if date <= now {
            return Err(MovieError::PastSessionDate);
        }
        if room_number <= 0 {
            return Err(MovieError::NonPositiveRoomNumber(room_number));
        }
        let timeslot: Timeslot = timeslot.parse()?;

        Ok(Self {
            id: Uuid::new_v4(),
            movie_id,
            date,
            timeslot,
            room_number,
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rstest::rstest;

    #[test]
    fn test_create_valid_movie() {
        let movie = Movie::new("The Matrix", 16).unwrap();
        assert_eq!(movie.title, "The Matrix");
        assert_eq!(movie.age_restriction, 16);
    }

    #[test]
    fn test_empty_title_rejected() {
        assert_eq!(Movie::new("   ", 10), Err(MovieError::EmptyTitle));
    }

    #[rstest]
    #[case(-1)]
    #[case(22)]
    fn test_age_restriction_out_of_range(#[case] age: i32) {
        assert_eq!(
            Movie::new("Some Movie", age),
            Err(MovieError::AgeRestrictionOutOfRange(age))
        );
    }

    #[rstest]
    #[case(0)]
    #[case(21)]
    fn test_age_restriction_bounds_inclusive(#[case] age: i32) {
        assert!(Movie::new("Some Movie", age).is_ok());
    }

    #[test]
    fn test_with_id_preserves_identity() {
        let movie = Movie::new("Original", 10).unwrap();
        let updated = Movie::with_id(movie.id, "Renamed", 12, movie.created_at).unwrap();
        assert_eq!(updated.id, movie.id);
        assert_eq!(updated.created_at, movie.created_at);
        assert_eq!(updated.title, "Renamed");
    }

    #[rstest]
    #[case("10:00-12:00", Timeslot::Morning)]
    #[case("12:00-14:00", Timeslot::Noon)]
    #[case("14:00-16:00", Timeslot::Afternoon)]
    #[case("16:00-18:00", Timeslot::Evening)]
    #[case("18:00-20:00", Timeslot::EveningPrime)]
    #[case("20:00-22:00", Timeslot::Night)]
    #[case("22:00-00:00", Timeslot::LateNight)]
    fn test_timeslot_round_trip(#[case] raw: &str, #[case] slot: Timeslot) {
        assert_eq!(raw.parse::<Timeslot>().unwrap(), slot);
        assert_eq!(slot.to_string(), raw);
    }

    #[rstest]
    #[case("09:00-11:00")]
    #[case("18:00-21:00")]
    #[case("evening")]
    fn test_timeslot_rejects_unknown(#[case] raw: &str) {
        assert!(raw.parse::<Timeslot>().is_err());
    }

    #[test]
    fn test_create_valid_session() {
        let date = Utc::now() + Duration::days(1);
        let session = MovieSession::new(Uuid::new_v4(), date, "18:00-20:00", 1).unwrap();
        assert_eq!(session.timeslot, Timeslot::EveningPrime);
        assert_eq!(session.room_number, 1);
    }

    #[test]
    fn test_past_session_date_rejected() {
        let date = Utc::now() - Duration::hours(1);
        assert_eq!(
            MovieSession::new(Uuid::new_v4(), date, "18:00-20:00", 1),
            Err(MovieError::PastSessionDate)
        );
    }

    #[rstest]
    #[case(0)]
    #[case(-3)]
    fn test_non_positive_room_rejected(#[case] room: i32) {
        let date = Utc::now() + Duration::days(1);
        assert_eq!(
            MovieSession::new(Uuid::new_v4(), date, "18:00-20:00", room),
            Err(MovieError::NonPositiveRoomNumber(room))
        );
    }

    #[test]
    fn test_invalid_timeslot_rejected() {
        let date = Utc::now() + Duration::days(1);
        assert!(matches!(
            MovieSession::new(Uuid::new_v4(), date, "11:00-13:00", 1),
            Err(MovieError::InvalidTimeslot(_))
        ));
    }
}

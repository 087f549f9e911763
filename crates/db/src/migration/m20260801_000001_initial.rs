//! Initial schema: users, movies, movie sessions, tickets.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(INITIAL_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS tickets CASCADE;
             DROP TABLE IF EXISTS movie_sessions CASCADE;
             DROP TABLE IF EXISTS movies CASCADE;
             DROP TABLE IF EXISTS users CASCADE;
             DROP TYPE IF EXISTS user_role;",
        )
        .await?;
        Ok(())
    }
}

const INITIAL_SQL: &str = r"
-- Roles are fixed at account creation
CREATE TYPE user_role AS ENUM ('manager', 'customer');

CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    username VARCHAR(255) NOT NULL UNIQUE,
    hashed_password VARCHAR(255) NOT NULL,
    role user_role NOT NULL,
    age INT NOT NULL CHECK (age >= 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE movies (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    title VARCHAR(255) NOT NULL,
    age_restriction INT NOT NULL CHECK (age_restriction BETWEEN 0 AND 21),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Titles are unique across the catalog
CREATE UNIQUE INDEX idx_movies_title ON movies(title);

CREATE TABLE movie_sessions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    movie_id UUID NOT NULL REFERENCES movies(id) ON DELETE CASCADE,
    date TIMESTAMPTZ NOT NULL,
    timeslot VARCHAR(11) NOT NULL,
    room_number INT NOT NULL CHECK (room_number > 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- A room holds one session per date and timeslot; this index is the
-- real guarantee behind the application-level availability check
CREATE UNIQUE INDEX idx_movie_sessions_booking
    ON movie_sessions(date, timeslot, room_number);

CREATE INDEX idx_movie_sessions_movie ON movie_sessions(movie_id);

CREATE TABLE tickets (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    -- SET NULL keeps purchase history when a session is deleted
    session_id UUID REFERENCES movie_sessions(id) ON DELETE SET NULL,
    purchased_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    is_used BOOLEAN NOT NULL DEFAULT false,
    used_at TIMESTAMPTZ
);

-- One ticket per user per session
CREATE UNIQUE INDEX idx_tickets_user_session ON tickets(user_id, session_id);

CREATE INDEX idx_tickets_user ON tickets(user_id);
";

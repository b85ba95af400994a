pub const SCHEMA: &str = r#"
-- Albums: one per scanned source directory
CREATE TABLE IF NOT EXISTS albums (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    path TEXT NOT NULL,
    created_at TEXT NOT NULL,
    archived INTEGER NOT NULL DEFAULT 0,
    thumbnail_photo_id INTEGER REFERENCES photos(id) ON DELETE SET NULL
);

CREATE INDEX IF NOT EXISTS idx_albums_archived ON albums(archived);

-- Photos: replaced wholesale on every rescan of their album
CREATE TABLE IF NOT EXISTS photos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    album_id INTEGER NOT NULL,
    file_path TEXT NOT NULL,
    filename TEXT NOT NULL,
    day_label TEXT,             -- subdirectory relative to the album root
    user_title TEXT,
    user_description TEXT,
    created_at TEXT,            -- capture time, "YYYY-MM-DDTHH:MM:SS" local
    gps_lat REAL,
    gps_lon REAL,
    FOREIGN KEY (album_id) REFERENCES albums(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_photos_album ON photos(album_id);
CREATE INDEX IF NOT EXISTS idx_photos_album_day ON photos(album_id, day_label);
CREATE INDEX IF NOT EXISTS idx_photos_created_at ON photos(created_at);
"#;

/// Column additions for catalogs created before the column existed.
/// Each statement fails harmlessly when the column is already present.
pub const MIGRATIONS: &[&str] = &[
    "ALTER TABLE albums ADD COLUMN thumbnail_photo_id INTEGER REFERENCES photos(id) ON DELETE SET NULL",
];

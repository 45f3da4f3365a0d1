pub mod songkick;
pub mod spotify;

pub use songkick::SongkickClient;
pub use spotify::SpotifyClient;

pub mod omdb_client;

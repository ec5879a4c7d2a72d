pub mod google_maps;
pub mod map_launcher;

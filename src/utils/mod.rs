// Low-level I/O helpers shared by the format parsers

pub mod io;

pub mod http_surface;

pub use http_surface::HttpSurface;

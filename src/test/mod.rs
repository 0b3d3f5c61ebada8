pub mod builder;

mod de;
mod macros;
mod stream;
mod value;

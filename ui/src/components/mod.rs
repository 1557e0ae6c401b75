//! Shared components: the pico.css building blocks and the account QR modal.
pub mod pico;
pub mod qr_code;

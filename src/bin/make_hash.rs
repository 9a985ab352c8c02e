//! Print an argon2 hash suitable for `MOD_PASSWORD_HASH`.
//!
//! Usage: `make-hash "your-password"`

use moddash::auth::password::hash_password;

fn main() {
    let Some(plain) = std::env::args().nth(1) else {
        eprintln!("Usage: make-hash \"your-password\"");
        std::process::exit(1);
    };
    match hash_password(&plain) {
        Ok(hash) => println!("{hash}"),
        Err(e) => {
            eprintln!("Failed to hash password: {e}");
            std::process::exit(1);
        }
    }
}

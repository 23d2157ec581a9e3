//! Racing and referral-following DNS resolvers.
//!
//! Resolution is built out of small [`Resolver`](clients::Resolver)s:
//!
//! * [`UdpResolver`](clients::UdpResolver) sends a query to one server.
//! * [`ParallelResolver`](clients::ParallelResolver) races several
//!   resolvers, returning the first successful response.
//! * [`RecursiveResolver`](clients::RecursiveResolver) follows referrals,
//!   racing the servers each referral points at until an answer is found.
//!
//! A [`Client`](clients::Client) sits on top, to look up addresses and names.
//!
//! # Example
//!
//! ```rust,no_run
//! use dnschase::clients::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), dnschase::Error> {
//!     let client = Client::google()?;
//!     println!("{:?}", client.lookup("bramp.net").await?);
//!     Ok(())
//! }
//! ```

// Macro borrowed from https://github.com/hyperium/hyper
// hyper is provided under the MIT license. See LICENSE.
macro_rules! cfg_feature {
    (
        #![$meta:meta]
        $($item:item)*
    ) => {
        $(
            #[cfg($meta)]
            #[cfg_attr(docsrs, doc(cfg($meta)))]
            $item
        )*
    }
}

#[macro_use]
extern crate num_derive;

mod display;
mod dns;
mod errors;
mod io;

pub mod clients;
pub mod types;

pub use crate::errors::{Error, Result};
pub use crate::types::*;

// Resolvers take one of these, so callers shouldn't need to depend on tokio-util.
pub use tokio_util::sync::CancellationToken;

//! GraphQL payload types.
//!
//! - [`Operation`]: the query, its variables and the [`OperationContext`]
//!   (endpoint URL and fetch options) it is sent with.
//! - [`GraphQLResponse`]: the decoded response body.
//!
//! # Example
//!
//! ```ignore
//! use lattice_exchange::graphql::Operation;
//!
//! let operation = Operation::new(r#"
//!     mutation CreateUser($input: CreateUserInput!) {
//!         createUser(input: $input) {
//!             id
//!         }
//!     }
//! "#)
//! .url("https://api.example.com/graphql")
//! .variable("input", serde_json::json!({
//!     "name": "John",
//!     "email": "john@example.com"
//! }));
//! ```

mod operation;
mod response;

pub use operation::{Operation, OperationContext};
pub use response::{GraphQLError, GraphQLLocation, GraphQLResponse, PathSegment};

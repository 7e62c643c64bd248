//! HTTP client for a checkpoint-based Isabelle proof-engine server.
//!
//! The server holds all proof state; this client only ever references
//! named checkpoints. Loading a theory or executing a proof step creates a
//! new named checkpoint; later calls resume from any previously created
//! name. Engine-reported failures carry free-text messages which callers
//! classify; this crate does not interpret them.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use isabelle_client::{IsabelleSession, SessionConfig};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SessionConfig::default();
//! let theory = Path::new("/afp/thys/Seq/Seq.thy");
//! let session = IsabelleSession::connect_for_theory(config, theory).await?;
//!
//! let lemma = r#"lemma reverse_reverse: "reverse (reverse xs) = xs""#;
//! let reply = session.load_theory(theory, lemma, true, "s", false).await?;
//! assert!(!reply.proof_done);
//!
//! let step = "by (induct xs) (simp_all add: reverse_conc)";
//! let reply = session.execute("s", step, "s.0").await?;
//! assert!(reply.proof_done);
//! session.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod protocol;
pub mod session;
pub mod types;

pub use protocol::StepReply;
pub use session::IsabelleSession;
pub use types::{EngineError, SessionConfig};

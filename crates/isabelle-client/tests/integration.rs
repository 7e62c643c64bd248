//! Integration tests against a live engine server.
//!
//! These need a running server (default `http://localhost:17000`) with the
//! standard HOL session image available, so they are `#[ignore]`d by
//! default. Run with: `cargo test -p isabelle-client -- --ignored --test-threads=1`
//!
//! Override the server location with `ENGINE_URL`.

use std::path::{Path, PathBuf};

use isabelle_client::{IsabelleSession, SessionConfig};

fn test_config() -> SessionConfig {
    let mut config = SessionConfig::default();
    if let Ok(url) = std::env::var("ENGINE_URL") {
        config.base_url = url;
    }
    config
}

/// Start a fresh theory, state a lemma, prove it directly and via hammer.
#[tokio::test]
#[ignore]
async fn new_theory_execute_and_hammer() {
    let session = IsabelleSession::connect(test_config(), "HOL", &[])
        .await
        .expect("failed to open session");

    session
        .new_theory(
            "Test",
            "state0",
            &[
                "Complex_Main".to_string(),
                "HOL-Computational_Algebra.Primes".to_string(),
            ],
            false,
        )
        .await
        .expect("newTheory failed");

    let lemma = r#"lemma foo: "prime p \<Longrightarrow> p > (1::nat)""#;
    let reply = session
        .execute("state0", lemma, "state1")
        .await
        .expect("lemma statement failed");
    assert!(!reply.proof_done);
    assert!(!reply.proof_goals.is_empty());

    let reply = session
        .execute("state1", "using prime_gt_1_nat by simp", "state2")
        .await
        .expect("proof failed");
    assert!(reply.proof_done);
    assert!(reply.proof_goals.is_empty());

    // An alternative proof found by the hammer must also close the goal.
    let step = session
        .hammer("state1", &[], &["prime_gt_1_nat".to_string()])
        .await
        .expect("hammer failed");
    let reply = session
        .execute("state1", &step, "state3")
        .await
        .expect("hammer proof failed");
    assert!(reply.proof_done);

    session.close().await.expect("close failed");
}

/// Load a stock theory up to a lemma and finish its proof.
#[tokio::test]
#[ignore]
async fn load_theory_until_lemma() {
    let theory = Path::new("/home/isabelle/Isabelle/src/HOL/Examples/Seq.thy");
    let session = IsabelleSession::connect_for_theory(test_config(), theory)
        .await
        .expect("failed to open session");

    let lemma = r#"lemma reverse_reverse: "reverse (reverse xs) = xs""#;
    let reply = session
        .load_theory(theory, lemma, true, "state0", false)
        .await
        .expect("loadTheory failed");
    assert!(!reply.proof_done);
    assert!(reply.proof_goals.starts_with("proof (prove)"));

    let description = session
        .describe_state("state0")
        .await
        .expect("describeState failed");
    assert!(!description.is_empty());

    let reply = session
        .execute(
            "state0",
            "by (induct xs) (simp_all add: reverse_conc)",
            "state1",
        )
        .await
        .expect("proof failed");
    assert!(reply.proof_done);

    session.close().await.expect("close failed");
}

/// Initialize a theory without executing any of it, then clean up states.
#[tokio::test]
#[ignore]
async fn init_only_and_forget() {
    let theory = PathBuf::from("/home/isabelle/Isabelle/src/HOL/Examples/Seq.thy");
    let session = IsabelleSession::connect_for_theory(test_config(), &theory)
        .await
        .expect("failed to open session");

    session
        .load_theory(&theory, "", false, "state0", true)
        .await
        .expect("init-only loadTheory failed");

    session.forget_state("state0").await.expect("forgetState failed");
    session
        .forget_all_states()
        .await
        .expect("forgetAllStates failed");

    session.close().await.expect("close failed");
}

/// Referencing an unknown state must surface an engine error, not a panic.
#[tokio::test]
#[ignore]
async fn unknown_state_is_engine_error() {
    let theory = Path::new("/home/isabelle/Isabelle/src/HOL/Examples/Seq.thy");
    let session = IsabelleSession::connect_for_theory(test_config(), theory)
        .await
        .expect("failed to open session");

    let result = session.execute("no_such_state", "by simp", "s.0").await;
    assert!(result.is_err());

    session.close().await.expect("close failed");
}

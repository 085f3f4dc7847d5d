//! Version stamp for the engine itself, independent of any operation's
//! own versioning. Bump when a change to Runner semantics would make a
//! replayed event trace ambiguous about which rules produced it.
pub const ENGINE_VERSION: &str = "1.0";

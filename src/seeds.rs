//! Built-in sample model response.
//!
//! Served when no model client is configured so the service stays usable
//! offline. It goes through the same parser as real model output and uses a
//! few of the looser spellings models tend to produce.

pub const SAMPLE_TOPIC: &str = "Rust programming";

pub fn sample_quiz_response() -> &'static str {
  r#"Sure! Here is your quiz.

### Basic Concepts
Q1: Which keyword declares an immutable variable binding in Rust?
a) var
b) let [CORRECT]
c) const mut
d) static mut
Explanation: `let` introduces a binding that is immutable unless marked `mut`.

Question 2: What does the `&` operator create?
a) A raw pointer
b) A shared reference [CORRECT]
c) A boxed value
d) A copy of the value
Explanation: `&value` borrows the value immutably.
Any number of shared references may exist at the same time.

## Advanced Concepts
Q1) What does a lifetime annotation such as `'a` describe?
a) How long a thread runs
b) When memory is freed by the garbage collector
c) A relationship between how long references must stay valid [CORRECT]
d) The stack size of a function
Explanation: Lifetimes let the borrow checker relate the validity of references.

[Q2] Which trait must a type implement to be sent to another thread?
- a) Sync
- b) Send [CORRECT]
- c) Copy
- d) Unpin
Reason: `Send` marks types whose ownership can be transferred across threads.

### Current Trends
Q1. Which runtime is most widely used for async Rust network services?
a) Tokio [CORRECT]
b) Rayon
c) Crossbeam
d) Diesel
Explanation: Tokio provides the reactor, scheduler and I/O primitives most async crates build on.

Q2: Which target lets Rust code run inside web browsers?
1) x86_64-pc-windows-msvc
2) thumbv7em-none-eabihf
3) wasm32-unknown-unknown [CORRECT]
4) aarch64-apple-darwin
Explanation: WebAssembly targets compile Rust to modules browsers can execute.
"#
}

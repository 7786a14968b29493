#![no_main]
use libfuzzer_sys::fuzz_target;

// The parser must terminate on any input and produce a total tree: every
// diagnostic-free path, every recovery path, and the context stack must all
// hold up under arbitrary bytes.
fuzz_target!(|data: &[u8]| {
    if let Ok(source) = std::str::from_utf8(data) {
        let result = resyn::parse(source);
        assert!(matches!(
            result.root,
            resyn::AstNode::CompilationUnit { .. }
        ));
    }
});

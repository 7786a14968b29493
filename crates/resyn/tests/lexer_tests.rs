//! Lexer integration tests over full programs.

use resyn::{Lexer, TokenKind};

#[test]
fn full_program_token_stream() {
    let source = "public function foo() returns int {\n    int x = 0x1F; // init\n}\n";
    let tokens = Lexer::tokenize(source);

    let significant: Vec<(TokenKind, &str)> = tokens
        .iter()
        .filter(|t| !t.is_trivia() && t.kind != TokenKind::Eof)
        .map(|t| (t.kind, t.text.as_str()))
        .collect();

    assert_eq!(
        significant,
        vec![
            (TokenKind::Public, "public"),
            (TokenKind::Function, "function"),
            (TokenKind::Identifier, "foo"),
            (TokenKind::OpenParen, "("),
            (TokenKind::CloseParen, ")"),
            (TokenKind::Returns, "returns"),
            (TokenKind::Type, "int"),
            (TokenKind::OpenBrace, "{"),
            (TokenKind::Type, "int"),
            (TokenKind::Identifier, "x"),
            (TokenKind::Assign, "="),
            (TokenKind::Hex, "0x1F"),
            (TokenKind::Semicolon, ";"),
            (TokenKind::CloseBrace, "}"),
        ]
    );
}

#[test]
fn trivia_is_materialized() {
    let source = "int x // note\n";
    let tokens = Lexer::tokenize(source);
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Type,
            TokenKind::Whitespace,
            TokenKind::Identifier,
            TokenKind::Whitespace,
            TokenKind::Comment,
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn concatenating_token_texts_reproduces_the_source() {
    let source = "function foo() {\n\tint x = 1 + 2; // sum\n}";
    let tokens = Lexer::tokenize(source);
    let rebuilt: String = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(rebuilt, source);
}

#[test]
fn positions_advance_across_lines() {
    let tokens = Lexer::tokenize("int\nfloat boolean");
    let int = &tokens[0];
    let float = &tokens[2];
    let boolean = &tokens[4];
    assert_eq!((int.span.line, int.span.start_col), (1, 1));
    assert_eq!((float.span.line, float.span.start_col), (2, 1));
    assert_eq!((boolean.span.line, boolean.span.start_col), (2, 7));
}

#[test]
fn invalid_runs_do_not_swallow_structure() {
    let tokens = Lexer::tokenize("int x = $$$;");
    let kinds: Vec<TokenKind> = tokens
        .iter()
        .filter(|t| !t.is_trivia())
        .map(|t| t.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Type,
            TokenKind::Identifier,
            TokenKind::Assign,
            TokenKind::Invalid,
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}

// End-to-end parsing of complete scripts through the public API

use lox_parser::*;
use pretty_assertions::assert_eq;

const COUNTER: &str = r#"
fun makeCounter() {
  var i = 0;
  fun count() {
    i = i + 1;
    return i;
  }
  return count;
}

var counter = makeCounter();
print counter();
print counter();
"#;

#[test]
fn test_parse_closure_program() {
    let (statements, errors) = parse_program(COUNTER);

    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    assert_eq!(statements.len(), 4);

    match &statements[0] {
        Stmt::Function(function) => {
            assert_eq!(function.display_name(), Some("makeCounter"));
            assert_eq!(function.body.len(), 3);
            assert!(matches!(function.body[1], Stmt::Function(_)));
        }
        other => panic!("Expected function declaration, got: {other:?}"),
    }
}

#[test]
fn test_parser_struct_api() {
    let mut parser = Parser::new("print 1; print ;");
    let statements = parser.parse();

    assert_eq!(statements.len(), 1);
    assert!(parser.had_error());
    assert_eq!(parser.errors().len(), 1);
    assert_eq!(parser.into_errors()[0].line(), 1);
}

#[test]
fn test_lexer_iterator_ends_after_eof() {
    let tokens: Vec<Token> = Lexer::new("a + 1").collect();
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();

    assert_eq!(
        kinds,
        vec![
            TokenKind::Identifier,
            TokenKind::Plus,
            TokenKind::Number,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_relexing_every_token_of_a_script() {
    for token in tokenize(COUNTER) {
        if token.is_eof() {
            continue;
        }

        let relexed = tokenize(&token.lexeme);
        assert_eq!(relexed.len(), 2, "lexeme {:?} split into pieces", token.lexeme);
        assert_eq!(relexed[0].kind, token.kind);
        assert_eq!(relexed[0].lexeme, token.lexeme);
    }
}

#[test]
fn test_deeply_nested_expression_parses() {
    let depth = 2_000;
    let source = format!("print {}1{};", "(".repeat(depth), ")".repeat(depth));
    let (statements, errors) = parse_program(&source);

    assert!(errors.is_empty());
    assert_eq!(statements.len(), 1);
}

#[test]
fn test_every_error_has_a_span_inside_the_source() {
    let source = "var 1 = 2;\nprint (;\nfun () {}\nclass { }";
    let (_, errors) = parse_program(source);

    assert_eq!(errors.len(), 4);
    for error in &errors {
        let span = error.span();
        assert!(span.offset() + span.len() <= source.len());
    }
}

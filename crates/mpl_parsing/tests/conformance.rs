//! Lexer and parser conformance cases

use mpl_ast::visit::NodeRef;
use mpl_parsing::diagnostics::ErrorCode;
use mpl_parsing::{parse_program, parse_source, tokenize, ErrorMode, ParseConfig};
use mpl_tokens::spanned::Spanned;
use mpl_tokens::symbols::SYMBOLS;
use mpl_tokens::token::{Token, TokenKind};
use std::ops::Range;
use test_log::test;

fn token_kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source, ErrorMode::FailFast)
        .unwrap_or_else(|e| panic!("{source:?} failed to tokenize: {e}"))
        .into_iter()
        .map(|token| token.kind())
        .filter(|kind| *kind != TokenKind::Eof)
        .collect()
}

fn assert_tokens(source: &str, expected: &[TokenKind]) {
    assert_eq!(token_kinds(source), expected, "tokens of {source:?}");
}

fn assert_parses(source: &str) {
    if let Err(diagnostics) = parse_source(source, &ParseConfig::default()) {
        panic!("{source:?} should parse, got:\n{}", diagnostics.render(source));
    }
}

fn first_error(source: &str) -> ErrorCode {
    match parse_source(source, &ParseConfig::default()) {
        Ok(program) => panic!("{source:?} should not parse, got {program}"),
        Err(diagnostics) => diagnostics
            .first()
            .map(|d| d.code)
            .unwrap_or_else(|| panic!("{source:?} failed without diagnostics")),
    }
}

fn tree(source: &str) -> String {
    parse_source(source, &ParseConfig::default())
        .unwrap_or_else(|e| panic!("{source:?} should parse, got {e}"))
        .to_string()
}

#[test]
fn greek_letters() {
    use TokenKind::*;
    for (glyph, alias, kind) in [
        ("α", "\\alpha", Alpha),
        ("β", "\\beta", Beta),
        ("γ", "\\gamma", Gamma),
        ("λ", "\\lambda", LambdaVar),
        ("π", "\\pi", Pi),
        ("ω", "\\omega", Omega),
    ] {
        assert_tokens(glyph, &[kind]);
        assert_tokens(alias, &[kind]);
    }
}

#[test]
fn type_symbols() {
    use TokenKind::*;
    assert_tokens("ℕ ℤ ℚ ℝ ℂ 𝔹", &[Nat, Int, Rat, Real, Complex, Bool]);
    assert_tokens("\\nat \\int \\real \\bool", &[Nat, Int, Real, Bool]);
}

#[test]
fn operators() {
    use TokenKind::*;
    assert_tokens("+ - × ÷ ∗ ∘", &[Plus, Minus, Times, Div, Ast, Compose]);
    assert_tokens("= ≠ < > ≤ ≥ ≈ ∼", &[Eq, Neq, Lt, Gt, Leq, Geq, Approx, Sim]);
    assert_tokens("∧ ∨ ⟹ ← ≜", &[And, Or, Implies, LeftArrow, Definition]);
    assert_tokens(
        "↯ ↴ ‖ ⊕ ⊖ ✎ ⏲ ⟳",
        &[Raise, Handle, Parallel, Alloc, Release, Trace, Delay, Periodic],
    );
}

#[test]
fn delimiters() {
    use TokenKind::*;
    assert_tokens(
        "( ) [ ] { } ⟨ ⟩ ⌈ ⌉ 〔 〕",
        &[
            LParen, RParen, LBrack, RBrack, LBrace, RBrace, LAngle, RAngle, LCeil, RCeil, LRaii,
            RRaii,
        ],
    );
}

#[test]
fn numbers_are_longest_match() {
    for number in ["123", "3.14", "1.23e10", "0x1A2B", "0b1101"] {
        let tokens = tokenize(number, ErrorMode::FailFast).unwrap();
        assert_eq!(tokens.len(), 2, "{number:?} should be a single token");
        assert_eq!(tokens[0].kind(), TokenKind::Number);
        assert_eq!(tokens[0].lexeme(), number);
    }
}

#[test]
fn strings() {
    assert_tokens("\"hello\"", &[TokenKind::String]);
    assert_tokens("\"hello\\nworld\"", &[TokenKind::String]);
    assert_tokens("\"\\\"quoted\\\"\"", &[TokenKind::String]);
    assert_tokens("\"\"\"raw\nstring\"\"\"", &[TokenKind::RawString]);
}

#[test]
fn identifiers() {
    for identifier in ["foo", "_bar", "baz123", "camelCase"] {
        assert_tokens(identifier, &[TokenKind::Identifier]);
    }
}

#[test]
fn comments_are_skipped() {
    assert_tokens("-- comment\n123", &[TokenKind::Number]);
    assert_tokens("{- multi\nline -} 456", &[TokenKind::Number]);
    let tokens = tokenize("{- nested {- comment -} -} 789", ErrorMode::FailFast).unwrap();
    assert_eq!(tokens[0].lexeme(), "789");
    assert_eq!(tokens.len(), 2);
}

#[test]
fn path_literals_are_two_tokens() {
    assert_tokens("🖫 \"path\"", &[TokenKind::Path, TokenKind::String]);
    assert_tokens("\\path \"path\"", &[TokenKind::Path, TokenKind::String]);
}

#[test]
fn complex_token_sequences() {
    use TokenKind::*;
    assert_tokens(
        "λx∈ℕ: x+1",
        &[LambdaVar, Identifier, In, Nat, Colon, Identifier, Plus, Number],
    );
    assert_tokens(
        "∀n∈ℕ: n≥0",
        &[Forall, Identifier, In, Nat, Colon, Identifier, Geq, Number],
    );
}

#[test]
fn every_glyph_has_an_equivalent_alias() {
    for symbol in SYMBOLS {
        let glyph = symbol.glyph.to_string();
        let alias = format!("\\{}", symbol.alias);
        assert_tokens(&glyph, &[symbol.kind]);
        assert_tokens(&alias, &[symbol.kind]);
    }
}

#[test]
fn tokenizing_is_repeatable() {
    let source = "server ≜ λport: 〔 socket ← bind(port) ⊕; handle socket 〕;";
    let first = tokenize(source, ErrorMode::FailFast).unwrap();
    let second = tokenize(source, ErrorMode::FailFast).unwrap();
    assert_eq!(first, second);
}

#[test]
fn lexical_errors() {
    for (source, code) in [
        ("\"open", ErrorCode::UnterminatedString),
        ("\"\"\"open", ErrorCode::UnterminatedRawString),
        ("{- open {- -}", ErrorCode::UnterminatedComment),
        ("\\nosuchthing", ErrorCode::UnknownEscape),
        ("\"bad \\q\"", ErrorCode::InvalidEscape),
        ("0x", ErrorCode::MalformedNumber),
        ("12abc", ErrorCode::MalformedNumber),
        ("a ** b", ErrorCode::UnexpectedCharacter),
    ] {
        let diagnostics = tokenize(source, ErrorMode::FailFast).unwrap_err();
        assert_eq!(diagnostics.codes(), [code], "{source:?}");
    }
}

#[test]
fn basic_expressions() {
    for source in ["123;", "\"hello\";", "true;", "false;", "α;", "foo;"] {
        assert_parses(source);
    }
}

#[test]
fn arithmetic() {
    for source in ["1 + 2;", "3 × 4;", "5 ÷ 2;", "a - b;", "x ∗ y ∗ z;"] {
        assert_parses(source);
    }
}

#[test]
fn precedence() {
    assert_eq!(tree("1 + 2 × 3;"), "Add(1, Mul(2, 3))");
    assert_eq!(tree("a × b + c × d;"), "Add(Mul(a, b), Mul(c, d))");
    assert_eq!(tree("a + b < c × d;"), "Lt(Add(a, b), Mul(c, d))");
    assert_eq!(tree("x ≥ y + 1;"), "Geq(x, Add(y, 1))");
    assert_eq!(tree("a < b ∧ c > d;"), "And(Lt(a, b), Gt(c, d))");
    assert_eq!(tree("x = y ∨ p ≠ q;"), "Or(Eq(x, y), Neq(p, q))");
    assert_eq!(tree("x ← a + b;"), "Assign(x, Add(a, b))");
    assert_eq!(tree("y ← p ∧ q;"), "Assign(y, And(p, q))");
}

#[test]
fn parentheses() {
    assert_eq!(tree("(1 + 2) × 3;"), "Mul(Add(1, 2), 3)");
    assert_parses("((a + b) × c);");
    assert_eq!(tree("(x ← y);"), "Assign(x, y)");
}

#[test]
fn function_application() {
    assert_eq!(tree("f x;"), "App(f, x)");
    assert_eq!(tree("g a b c;"), "App(App(App(g, a), b), c)");
    assert_eq!(tree("sin π;"), "App(sin, π)");
    assert_eq!(tree("(f x) y;"), "App(App(f, x), y)");
}

#[test]
fn lambdas() {
    assert_eq!(tree("λx: x + 1;"), "Lambda(x, Add(x, 1))");
    assert_eq!(tree("λx∈ℕ: x × 2;"), "Lambda(x, Nat, Mul(x, 2))");
    assert_eq!(tree("λa: λb: a + b;"), "Lambda(a, Lambda(b, Add(a, b)))");
    assert_eq!(tree("(λx: x × x) 5;"), "App(Lambda(x, Mul(x, x)), 5)");
}

#[test]
fn quantifiers() {
    assert_eq!(tree("∀x∈S: P x;"), "Forall(x, S, App(P, x))");
    assert_eq!(tree("∀n∈ℕ: n ≥ 0;"), "Forall(n, Nat, Geq(n, 0))");
    assert_eq!(
        tree("∀x∈A: ∀y∈B: f x y;"),
        "Forall(x, A, Forall(y, B, App(App(f, x), y)))"
    );
}

#[test]
fn definitions() {
    assert_eq!(tree("f ≜ λx: x + 1;"), "Def(f, Lambda(x, Add(x, 1)))");
    assert_eq!(tree("pi ≜ 3.14159;"), "Def(pi, 3.14159)");
    assert_eq!(tree("id ≜ λx: x;"), "Def(id, Lambda(x, x))");
}

#[test]
fn blocks() {
    assert_eq!(
        tree("{ x ← 1; y ← 2; x + y }"),
        "Block(Assign(x, 1); Assign(y, 2); Add(x, y))"
    );
    assert_parses("{ a ← b; { c ← d; } e }");
    assert_eq!(tree("{ }"), "Block()");
}

#[test]
fn conditionals() {
    assert_eq!(tree("x > 0 ⟹ x | -x;"), "Conditional(Gt(x, 0), x, Neg(x))");
    assert_parses("(n = 0 ⟹ 1) | (n × fact (n-1));");
}

#[test]
fn choice_types() {
    assert_eq!(tree("⟨\"ok\"|\"error\"⟩;"), "Choice(\"ok\", \"error\")");
    assert_eq!(tree("⟨x|⊥⟩;"), "Choice(x, ⊥)");
    assert_parses("⟨result|exception⟩;");
}

#[test]
fn collections() {
    assert_eq!(tree("[];"), "List[]");
    assert_eq!(tree("[1, 2, 3];"), "List[1, 2, 3]");
    assert_eq!(tree("[[1], [2], [3]];"), "List[List[1], List[2], List[3]]");
    assert_eq!(tree("∅;"), "Set{}");
    assert_eq!(tree("{x, y, z};"), "Set{x, y, z}");
    assert_eq!(
        tree("{name: \"Alice\", age: 30};"),
        "Record{name: \"Alice\", age: 30}"
    );
    assert_parses("{x: 1, y: 2, z: 3};");
}

#[test]
fn effects() {
    assert_eq!(tree("↯\"error\";"), "Raise(\"error\")");
    assert_eq!(tree("✎\"log message\";"), "Trace(\"log message\")");
    assert_eq!(tree("⏲ 100;"), "Delay(100)");
    assert_eq!(tree("x ↴ {↯e ⇒ handle e};"), "Handle(x, [e => App(handle, e)])");
}

#[test]
fn parallel() {
    assert_eq!(tree("a ‖ b;"), "Parallel(a, b)");
    assert_eq!(tree("task1 ‖ task2 ‖ task3;"), "Parallel(task1, task2, task3)");
    assert_eq!(tree("(f x) ‖ (g y);"), "Parallel(App(f, x), App(g, y))");
}

#[test]
fn atomic_sections() {
    assert_parses("⌈x ← x + 1⌉;");
    assert_eq!(
        tree("⌈critical section⌉_lock;"),
        "Atomic[lock](App(critical, section))"
    );
}

#[test]
fn resource_blocks() {
    assert_eq!(
        tree("〔 r ← resource ⊕; use r 〕;"),
        "Resource(r ← Alloc(resource); App(use, r))"
    );
    assert_parses("〔 f ← open \"file\"; read f 〕;");
}

#[test]
fn code_quotation() {
    assert_eq!(tree("⌜λx: x + 1⌝;"), "Quote(Lambda(x, Add(x, 1)))");
    assert_eq!(tree("⌞quote⌟;"), "Unquote(quote)");
}

#[test]
fn modules() {
    assert_eq!(
        tree("𝓜 Math ⇒ { pi ≜ 3.14; };"),
        "Module(Math, Block(Def(pi, 3.14)))"
    );
    assert_parses("𝓜 Utils ⇒ { f ≜ λx: x; g ≜ λy: y × 2; };");
}

#[test]
fn paths() {
    assert_eq!(tree("🖫\"file.txt\";"), "Path(\"file.txt\")");
    assert_eq!(tree("\\path\"directory/file\";"), "Path(\"directory/file\")");
}

#[test]
fn complex_expressions() {
    assert_parses("factorial ≜ λn∈ℕ: (n≤1 ⟹ 1) | (n×factorial(n-1));");
    assert_parses(
        "processFile ≜ λpath: { data ← readFile(🖫path); result ← transform(data); \
         writeFile(result, 🖫\"output.txt\"); ⟨\"success\"|\"failed\"⟩ } ↴ {↯e ⇒ ⟨⊥|e⟩};",
    );
    assert_eq!(
        tree(
            "server ≜ λport: 〔 socket ← bind(port) ⊕; ∀request∈acceptLoop(socket): \
             ( data ← ↽_socket request; response ← processRequest(data); ⇀_socket response ) \
             ‖ handleNext() 〕;"
        ),
        "Def(server, Lambda(port, Resource(socket ← Alloc(App(bind, port)); \
         Forall(request, App(acceptLoop, socket), \
         Parallel(Seq(Assign(data, Receive(socket, request)); \
         Assign(response, App(processRequest, data)); Send(socket, response)), \
         App(handleNext, Tuple()))))))"
    );
}

#[test]
fn invalid_syntax() {
    assert_eq!(first_error("x ← 1 y ← 2"), ErrorCode::UnexpectedToken);
    assert_eq!(first_error("(x + y))"), ErrorCode::UnmatchedDelimiter);
    assert_eq!(first_error("((x + y)"), ErrorCode::UnmatchedDelimiter);
    assert_eq!(first_error("x ++ y;"), ErrorCode::UnexpectedToken);
    assert_eq!(first_error("a ** b;"), ErrorCode::UnexpectedCharacter);
    assert_eq!(first_error("λ: x;"), ErrorCode::MissingProduction);
    assert_eq!(first_error("λx y: x + y;"), ErrorCode::UnexpectedToken);
}

#[test]
fn semicolon_rules() {
    assert_parses("x ← 1; y ← 2;");
    assert_parses("{ x ← 1; y ← 2 }");
    assert_parses("x ← 1");
    assert_parses("y ← 2");
}

#[test]
fn error_reports() {
    let diagnostics = parse_source("x ← 1 y ← 2", &ParseConfig::default()).unwrap_err();
    assert_eq!(
        diagnostics.to_report(),
        ["line 1:6 mismatched input 'y' expecting ';'"]
    );
    let diagnostics = parse_source("a ** b;", &ParseConfig::default()).unwrap_err();
    assert_eq!(
        diagnostics.to_report(),
        ["line 1:2 token recognition error at: '*'"]
    );
    let diagnostics = parse_source("f ≜ (1 +\n  2", &ParseConfig::default()).unwrap_err();
    assert_eq!(
        diagnostics.to_report(),
        ["line 1:4 unmatched delimiter '(', missing ')'"]
    );
}

#[test]
fn collect_all_reports_every_error() {
    let config = ParseConfig::default().with_mode(ErrorMode::CollectAll);
    let source = "x ← 1 y ← 2;\nok ← 3;\nz ← a ** b;\nλ: x;\n";
    let diagnostics = parse_source(source, &config).unwrap_err();
    assert_eq!(
        diagnostics.codes(),
        [
            ErrorCode::UnexpectedToken,
            ErrorCode::UnexpectedCharacter,
            ErrorCode::MissingProduction
        ]
    );
    let lines: Vec<_> = diagnostics.sorted().iter().map(|d| d.span.start().line).collect();
    assert_eq!(lines, [1, 3, 4]);
}

#[test]
fn fail_fast_reports_one_error() {
    let source = "x ← 1 y ← 2;\nz ← a ** b;\n";
    let diagnostics = parse_source(source, &ParseConfig::default()).unwrap_err();
    assert_eq!(diagnostics.len(), 1);
}

#[test]
fn nesting_limit() {
    let depth = 200;
    let source = format!("{}x{};", "(".repeat(depth), ")".repeat(depth));
    let config = ParseConfig::default().with_max_depth(32);
    let diagnostics = parse_source(&source, &config).unwrap_err();
    assert_eq!(diagnostics.codes(), [ErrorCode::NestingTooDeep]);

    let shallow = format!("{}x{};", "(".repeat(8), ")".repeat(8));
    assert_eq!(tree(&shallow), "x");
}

/// Runs `f` on a thread with a 2 MiB stack, the default for spawned threads
fn on_small_stack<T, F>(f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(f)
        .expect("could not spawn parser thread")
        .join()
        .expect("parser thread panicked")
}

fn nested(open: &str, inner: &str, close: &str, depth: usize) -> String {
    format!("{}{inner}{};", open.repeat(depth), close.repeat(depth))
}

#[test]
fn default_nesting_limit_on_small_stack() {
    // every parenthesis costs the parentheses, statement and expression productions, on top of
    // the outermost statement and expression
    let deepest = (ParseConfig::DEFAULT_MAX_DEPTH - 2) / 3;
    let (under, over) = on_small_stack(move || {
        let config = ParseConfig::default();
        (
            parse_source(&nested("(", "x", ")", deepest), &config).map(|p| p.to_string()),
            parse_source(&nested("(", "x", ")", deepest + 1), &config).map_err(|d| d.codes()),
        )
    });
    assert_eq!(under.unwrap(), "x");
    assert_eq!(over.unwrap_err(), [ErrorCode::NestingTooDeep]);
}

#[test]
fn deep_lists_and_lambdas_on_small_stack() {
    let results = on_small_stack(|| {
        let config = ParseConfig::default();
        [
            nested("[", "x", "]", 127),
            nested("λx: ", "x", "", 127),
            nested("[", "x", "]", 500),
            nested("-", "x", "", 1000),
        ]
        .map(|source| parse_source(&source, &config).map_err(|d| d.codes()))
    });
    let [lists, lambdas, too_many_lists, negations] = results;
    assert!(lists.is_ok(), "{lists:?}");
    assert!(lambdas.is_ok(), "{lambdas:?}");
    assert_eq!(too_many_lists.unwrap_err(), [ErrorCode::NestingTooDeep]);
    assert_eq!(negations.unwrap_err(), [ErrorCode::NestingTooDeep]);
}

#[test]
fn invalid_escape_reported_once() {
    let config = ParseConfig::default().with_mode(ErrorMode::CollectAll);
    let diagnostics = parse_source("x ← \"bad \\q escape\";\ny ← 1;", &config).unwrap_err();
    assert_eq!(
        diagnostics.to_report(),
        ["line 1:9 invalid escape sequence \\q"]
    );
}

#[test]
fn parsing_pre_scanned_tokens() {
    let source = "f ≜ λx: x + 1;";
    let tokens = tokenize(source, ErrorMode::FailFast).unwrap();
    let from_tokens = parse_program(tokens, &ParseConfig::default()).unwrap();
    let from_source = parse_source(source, &ParseConfig::default()).unwrap();
    assert_eq!(from_tokens, from_source);
}

/// Tokens that carry content of their own, which must always belong to some child node
fn is_content(kind: TokenKind) -> bool {
    kind.is_greek()
        || kind.is_type_symbol()
        || matches!(
            kind,
            TokenKind::Identifier
                | TokenKind::Number
                | TokenKind::String
                | TokenKind::RawString
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Bottom
                | TokenKind::EmptySet
        )
}

/// Checks that `source[gap]` is made of whole tokens and whitespace only, and returns the
/// kinds of those tokens
fn gap_tokens(source: &str, tokens: &[Token], gap: Range<usize>) -> Vec<TokenKind> {
    let inside: Vec<_> = tokens
        .iter()
        .filter(|t| !t.is_eof() && gap.start <= t.span().offset() && t.span().range().end <= gap.end)
        .collect();
    let mut covered = vec![false; gap.len()];
    for token in &inside {
        for i in token.span().range() {
            covered[i - gap.start] = true;
        }
    }
    for (i, c) in source[gap.clone()].char_indices() {
        assert!(
            c.is_whitespace() || covered[i],
            "{:?} splits a token in {source:?}",
            &source[gap.clone()]
        );
    }
    inside.iter().map(|t| t.kind()).collect()
}

/// A node's span is exactly its children joined by the tokens of its grammar rule: every child
/// lies inside its parent in order, and what is left between them (and at the edges) is only
/// delimiters and operators.
fn assert_spans_nest(source: &str) {
    let program = parse_source(source, &ParseConfig::default()).unwrap();
    let tokens = tokenize(source, ErrorMode::FailFast).unwrap();
    NodeRef::Program(&program).walk(&mut |node| {
        let span = node.span();
        let children = node.children();
        let mut previous_end = span.offset();
        let mut gaps = vec![];
        for child in &children {
            let child_span = child.span();
            assert!(
                span.contains(child_span),
                "{:?} is outside of {:?} in {source:?}",
                child_span.source_text(source),
                span.source_text(source)
            );
            assert!(
                child_span.offset() >= previous_end,
                "{:?} is out of order in {source:?}",
                child_span.source_text(source)
            );
            gaps.push(previous_end..child_span.offset());
            previous_end = child_span.range().end;
        }
        gaps.push(previous_end..span.range().end);

        for gap in gaps {
            let kinds = gap_tokens(source, &tokens, gap.clone());
            if !children.is_empty() {
                assert!(
                    !kinds.iter().any(|kind| is_content(*kind)),
                    "{:?} of {:?} belongs to no child in {source:?}",
                    &source[gap],
                    span.source_text(source)
                );
            }
        }
    });
}

#[test]
fn spans_cover_children() {
    for source in [
        "x > 0 ⟹ x | -x;",
        "f ≜ λx∈ℕ: x × 2;",
        "{ a ← b; { c ← d; } e }",
        "𝓜 M ⇒ { f ≜ λx: x; };",
        "⌈a; b⌉_lock;",
        "〔 r ← resource ⊕; use r 〕;",
        "x ↴ {↯e ⇒ handle e};",
        "↽_in x ‖ ⇀_out y;",
        "{name: \"Ada\", tags: [1, 2,]};",
        "🖫 \"data\";",
    ] {
        assert_spans_nest(source);
    }
}

#[test]
fn node_spans_match_source() {
    let source = "total ≜ sum [1, 2, 3];";
    let program = parse_source(source, &ParseConfig::default()).unwrap();
    assert_eq!(
        program.statements[0].span().source_text(source),
        Some("total ≜ sum [1, 2, 3]")
    );
    assert_eq!(program.span().source_text(source), Some(source));
}

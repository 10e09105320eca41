use libm15::{op::Are, word::Word};
use m15asm::{
    assemble_lines, assemble_program,
    error::AsmError,
    labels::SymbolKind,
    macros::expand_macros,
};

fn words(lines: &[&str]) -> Vec<Word> {
    assemble_lines(lines).code.iter().map(|w| w.word).collect()
}

#[test]
fn labeled_add() {
    let assembly = assemble_lines(&["LABEL: add #5, r2"]);

    assert_eq!(assembly.code.len(), 3);
    let label = assembly.symbols.find("LABEL").unwrap();
    assert_eq!(label.kind, SymbolKind::Code);
    assert_eq!(label.address, 100);
}

#[test]
fn data_directive() {
    let assembly = assemble_lines(&[".data 3, -7, 2"]);

    let data: Vec<(usize, Word)> = assembly.data.iter().map(|d| (d.address, d.word)).collect();
    assert_eq!(data, vec![(0, 3), (1, 32761), (2, 2)]);
    assert_eq!(assembly.data_length(), 3);
}

#[test]
fn string_directive() {
    let assembly = assemble_lines(&[".data 9", "STR: .string \"AB\""]);

    let data: Vec<Word> = assembly.data.iter().map(|d| d.word).collect();
    assert_eq!(data, vec![9, 65, 66, 0]);
    let label = assembly.symbols.find("STR").unwrap();
    assert_eq!(label.kind, SymbolKind::Data);
    assert_eq!(label.address, 1 + assembly.ic);
}

#[test]
fn external_operand() {
    let assembly = assemble_lines(&["X: .extern EXT", "jmp EXT"]);

    assert!(assembly.symbols.find("X").is_none());
    let operand = assembly.code[1].word;
    assert_eq!(Are::from_word(operand), Some(Are::External));
    assert_eq!(operand >> 3, 0);
    assert_eq!(assembly.externals[0].name, "EXT");
    assert_eq!(assembly.externals[0].address, 101);
}

#[test]
fn too_many_operands() {
    let assembly = assemble_lines(&["mov r1, r2, r3"]);

    assert!(assembly.code.is_empty());
    assert_eq!(assembly.diagnostics.count(), 1);
    let error = &assembly.diagnostics.iter().next().unwrap().error;
    assert!(matches!(error, AsmError::InvalidOperands(_)));
}

#[test]
fn word_counts() {
    assert_eq!(words(&["stop"]).len(), 1);
    assert_eq!(words(&["clr r1"]).len(), 2);
    assert_eq!(words(&["mov r1, *r2"]).len(), 2);
    assert_eq!(words(&["mov #1, r2"]).len(), 3);
    assert_eq!(words(&["X: cmp X, X"]).len(), 3);
}

#[test]
fn data_follows_code() -> anyhow::Result<()> {
    let assembly = assemble_program(include_str!("../programs/ps.as"))?;

    assert_eq!(assembly.ic, 100 + assembly.code_length());
    assert!(assembly.code.iter().all(|w| w.word & 0x80_00 == 0));
    assert!(assembly.data.iter().all(|d| d.word & 0x80_00 == 0));

    // entry promotion replaces the kind, so K is the only Data symbol left
    let k = assembly.symbols.find("K").unwrap();
    assert_eq!(k.kind, SymbolKind::Data);
    assert_eq!(k.address, 8 + assembly.ic);
    let list = assembly.symbols.find("LIST").unwrap();
    assert_eq!(list.kind, SymbolKind::Entry);
    assert_eq!(list.address, 5 + assembly.ic);

    for external in &assembly.externals {
        let word = assembly
            .code
            .iter()
            .find(|w| w.address == external.address)
            .unwrap();
        assert_eq!(Are::from_word(word.word), Some(Are::External));
    }
    Ok(())
}

#[test]
fn expansion_is_stable() -> anyhow::Result<()> {
    let once = expand_macros(include_str!("../programs/ps.as"))?;
    let twice = expand_macros(&once.join("\n"))?;
    assert_eq!(once, twice);
    assert!(once.iter().all(|l| !l.contains("macr")));
    Ok(())
}

#[test]
fn macro_errors_are_fatal() {
    let err = assemble_program(include_str!("../programs/bad_macro.as")).unwrap_err();
    let diagnostic = err.downcast_ref::<m15asm::error::Diagnostic>().unwrap();
    assert_eq!(diagnostic.line, 1);
    assert_eq!(diagnostic.error, AsmError::InvalidMacroName("stop".into()));
}

#[test]
fn unreferable_labels_fail_where_defined() {
    let assembly = assemble_lines(&["my_label: stop", "r3: stop", "jmp r3"]);

    assert!(assembly.symbols.is_empty());
    let errors: Vec<(usize, &AsmError)> = assembly
        .diagnostics
        .iter()
        .map(|d| (d.line, &d.error))
        .collect();
    assert_eq!(
        errors,
        vec![
            (1, &AsmError::InvalidLabel("my_label".into())),
            (2, &AsmError::InvalidLabel("r3".into())),
        ]
    );
    // r3 is still the register
    assert_eq!(assembly.code[1].word, (3 << 3) | 0b100);
}

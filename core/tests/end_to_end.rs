use retrieval_core::builder::collection_files;
use retrieval_core::query::{format_result, parse_query_file};
use retrieval_core::{build_index, BooleanRetriever, BuildConfig, BuildError, MissingIdPolicy, QueryError};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_collection(dir: &Path) {
    fs::create_dir_all(dir.join("sub")).unwrap();
    // "a_first" sorts before "b_second", which sorts before "sub"
    fs::write(
        dir.join("a_first"),
        "<DOC>\n<DOCNO> d1 </DOCNO>\n<TEXT>\ncat dog cat\n</TEXT>\n</DOC>\n\
         <DOC>\n<DOCNO>d2</DOCNO>\n<TEXT>dog</TEXT>\n<TEXT>bird</TEXT>\n</DOC>\n",
    )
    .unwrap();
    fs::write(dir.join("b_second"), "<DOC>\n<TEXT>orphan text</TEXT>\n</DOC>\n").unwrap();
    fs::write(dir.join("sub").join("c_third"), "<DOC><DOCNO>d3</DOCNO><TEXT>cat bird</TEXT></DOC>").unwrap();
}

fn config(parallel: bool) -> BuildConfig {
    BuildConfig { missing_id: MissingIdPolicy::Skip, parallel }
}

#[test]
fn builds_and_answers_queries() {
    let dir = tempdir().unwrap();
    write_collection(dir.path());
    let (index, stats) = build_index(dir.path(), &config(true)).unwrap();

    assert_eq!(stats.files, 3);
    assert_eq!(stats.documents, 3);
    assert_eq!(stats.skipped, 1);
    assert_eq!(index.postings("cat"), &[0, 2]);
    assert_eq!(index.postings("dog"), &[0, 1]);
    assert_eq!(index.postings("bird"), &[1, 2]);
    assert_eq!(index.doc_freq("cat"), 2);
    assert_eq!(index.doc_freq("orphan"), 0);

    let retriever = BooleanRetriever::new(&index);
    assert_eq!(retriever.retrieve("cat dog AND").unwrap(), vec!["d1"]);
    assert_eq!(retriever.retrieve("cat bird OR").unwrap(), vec!["d1", "d2", "d3"]);
    assert_eq!(retriever.retrieve("cat bird NOT").unwrap(), vec!["d1"]);
    assert!(retriever.retrieve("nonexistentterm123").unwrap().is_empty());
    assert_eq!(
        retriever.retrieve("cat AND"),
        Err(QueryError::MissingOperand { op: retrieval_core::Operator::And, position: 2, available: 1 })
    );
}

#[test]
fn doc_freq_matches_posting_lengths_and_ids_are_dense() {
    let dir = tempdir().unwrap();
    write_collection(dir.path());
    let (index, _) = build_index(dir.path(), &config(false)).unwrap();

    for term in index.terms() {
        assert_eq!(index.doc_freq(term) as usize, index.postings(term).len(), "term {term}");
        let list = index.postings(term);
        assert!(list.windows(2).all(|w| w[0] < w[1]), "term {term} not strictly ascending");
        assert!(list.iter().all(|&id| id < index.num_docs()));
    }

    let ids: Vec<&str> = (0..index.num_docs()).map(|id| index.external_id(id).unwrap()).collect();
    assert_eq!(ids, vec!["d1", "d2", "d3"]);
    let distinct: HashSet<&str> = ids.iter().copied().collect();
    assert_eq!(distinct.len(), ids.len());
    assert_eq!(index.external_id(index.num_docs()), None);
}

#[test]
fn parallel_and_sequential_builds_agree() {
    let dir = tempdir().unwrap();
    for i in 0..20 {
        let body: String = (0..30).map(|j| format!("t{} ", (i * j) % 17)).collect();
        fs::write(
            dir.path().join(format!("f{i:02}")),
            format!("<DOC><DOCNO>doc-{i}-a</DOCNO><TEXT>{body}</TEXT></DOC><DOC><DOCNO>doc-{i}-b</DOCNO><TEXT>t{i}</TEXT></DOC>"),
        )
        .unwrap();
    }
    let (par, _) = build_index(dir.path(), &config(true)).unwrap();
    let (seq, _) = build_index(dir.path(), &config(false)).unwrap();

    assert_eq!(par.external_ids(), seq.external_ids());
    assert_eq!(par.vocabulary_len(), seq.vocabulary_len());
    for term in seq.terms() {
        assert_eq!(par.postings(term), seq.postings(term), "term {term}");
    }
}

#[test]
fn fail_policy_aborts_build() {
    let dir = tempdir().unwrap();
    write_collection(dir.path());
    let cfg = BuildConfig { missing_id: MissingIdPolicy::Fail, ..BuildConfig::default() };
    match build_index(dir.path(), &cfg) {
        Err(BuildError::MissingDocId { path, ordinal }) => {
            assert!(path.ends_with("b_second"));
            assert_eq!(ordinal, 1);
        }
        other => panic!("expected MissingDocId, got {other:?}"),
    }
}

#[test]
fn missing_collection_is_an_error() {
    let dir = tempdir().unwrap();
    let err = build_index(&dir.path().join("nope"), &BuildConfig::default()).unwrap_err();
    assert!(matches!(err, BuildError::NotFound(_)));
}

#[test]
fn single_file_collection_with_invalid_utf8() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("ap.bin");
    fs::write(&file, b"<DOC><DOCNO>x1</DOCNO><TEXT>caf\xff na\xffive latte</TEXT></DOC>").unwrap();

    let (index, stats) = build_index(&file, &BuildConfig::default()).unwrap();
    assert_eq!(stats.files, 1);
    assert_eq!(index.postings("latte"), &[0]);
    assert_eq!(index.postings("caf"), &[0]);
    assert_eq!(index.postings("naive"), &[0]);
    let mut terms: Vec<&str> = index.terms().collect();
    terms.sort_unstable();
    assert_eq!(terms, vec!["caf", "latte", "naive"]);
}

#[test]
fn directory_files_come_before_subdirectories() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("a_dir")).unwrap();
    fs::write(dir.path().join("a_dir").join("inner"), "<DOC><DOCNO>nested</DOCNO><TEXT>x</TEXT></DOC>").unwrap();
    fs::write(dir.path().join("z_file"), "<DOC><DOCNO>top</DOCNO><TEXT>x</TEXT></DOC>").unwrap();
    fs::write(dir.path().join("b_file"), "<DOC><DOCNO>first</DOCNO><TEXT>x</TEXT></DOC>").unwrap();

    let files = collection_files(dir.path()).unwrap();
    let names: Vec<String> =
        files.iter().map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/")).collect();
    assert_eq!(names, vec!["b_file", "z_file", "a_dir/inner"]);

    let (index, _) = build_index(dir.path(), &config(true)).unwrap();
    assert_eq!(index.external_ids(), &["first", "top", "nested"]);
}

#[test]
fn first_failing_file_in_order_is_reported() {
    let dir = tempdir().unwrap();
    for i in 0..16 {
        let body = if i % 4 == 3 { "<DOC><TEXT>no id</TEXT></DOC>" } else { "<DOC><DOCNO>ok</DOCNO></DOC>" };
        fs::write(dir.path().join(format!("f{i:02}")), body).unwrap();
    }
    let cfg = BuildConfig { missing_id: MissingIdPolicy::Fail, parallel: true };
    for _ in 0..8 {
        match build_index(dir.path(), &cfg) {
            Err(BuildError::MissingDocId { path, .. }) => assert!(path.ends_with("f03"), "got {}", path.display()),
            other => panic!("expected MissingDocId, got {other:?}"),
        }
    }
}

#[test]
fn query_file_produces_one_line_per_query() {
    let dir = tempdir().unwrap();
    write_collection(dir.path());
    let (index, _) = build_index(dir.path(), &BuildConfig::default()).unwrap();
    let retriever = BooleanRetriever::new(&index);

    let queries = "cat dog AND\n\ncat bird or\nzebra\ncat AND\n";
    let lines: Vec<String> = parse_query_file(queries)
        .into_iter()
        .map(|q| retriever.retrieve(q.text).map(|ids| format_result(&ids)).unwrap_or_default())
        .collect();
    assert_eq!(lines, vec!["d1", "d1 d2 d3", "", ""]);
}

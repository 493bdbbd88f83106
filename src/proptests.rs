use std::collections::VecDeque;

use proptest::prelude::*;
use proptest::sample::Index;

use crate::decode::Decoder;
use crate::encode::Encoder;
use crate::table::CodeTable;

/// One step against the table. Extensions pick an already-stored string as
/// the prefix so the insertion precondition always holds.
#[derive(Debug, Clone)]
enum Action {
    Extend { pick: Index, bit: bool },
    Drop,
    Restore,
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => (any::<Index>(), any::<bool>()).prop_map(|(pick, bit)| Action::Extend { pick, bit }),
        2 => Just(Action::Drop),
        1 => Just(Action::Restore),
    ]
}

proptest! {
    #[test]
    fn table_invariants_hold_under_any_op_sequence(
        actions in prop::collection::vec(action(), 1..200),
    ) {
        let mut table = CodeTable::new();
        // Insertion-ordered mirror of every string in the trie, and of the
        // codes waiting to be retired.
        let mut strings: Vec<Vec<bool>> = vec![vec![false], vec![true]];
        let mut queued: VecDeque<Vec<bool>> = VecDeque::new();

        for action in actions {
            match action {
                Action::Extend { pick, bit } => {
                    let mut string = strings[pick.index(strings.len())].clone();
                    string.push(bit);
                    if !table.contains_string(&string) {
                        let parent = string[..string.len() - 1].to_vec();
                        let mut sibling = string.clone();
                        let last = sibling.len() - 1;
                        sibling[last] = !sibling[last];
                        let retires =
                            table.code_of(&parent).is_some() && table.contains_string(&sibling);
                        table.insert(&string);
                        strings.push(string);
                        if retires {
                            queued.push_back(parent);
                        }
                    }
                }
                Action::Drop => {
                    let before = table.len();
                    table.drop_oldest_redundant();
                    match queued.pop_front() {
                        Some(oldest) => {
                            // The oldest completed parent lost its code...
                            prop_assert_eq!(table.code_of(&oldest), None);
                            prop_assert_eq!(table.len(), before - 1);
                        }
                        // ...and an empty queue leaves the table alone.
                        None => prop_assert_eq!(table.len(), before),
                    }
                }
                Action::Restore => {
                    table.restore_all_codes();
                    queued.clear();
                    // Every stored string is coded again.
                    prop_assert_eq!(table.len(), strings.len());
                }
            }
            prop_assert_eq!(table.strings(), strings.len());
            table.check_invariants();
        }

        // Whatever happened, the stored strings are all still findable.
        for string in &strings {
            prop_assert!(table.contains_string(string));
        }
    }

    #[test]
    fn restored_codes_follow_insertion_order(
        actions in prop::collection::vec(action(), 1..100),
    ) {
        let mut table = CodeTable::new();
        let mut strings: Vec<Vec<bool>> = vec![vec![false], vec![true]];

        for action in actions {
            match action {
                Action::Extend { pick, bit } => {
                    let mut string = strings[pick.index(strings.len())].clone();
                    string.push(bit);
                    if !table.contains_string(&string) {
                        table.insert(&string);
                        strings.push(string);
                    }
                }
                Action::Drop => table.drop_oldest_redundant(),
                Action::Restore => table.restore_all_codes(),
            }
        }

        table.restore_all_codes();
        for (code, string) in strings.iter().enumerate() {
            prop_assert_eq!(table.code_of(string), Some(code));
            prop_assert_eq!(&table.string_of(code), string);
        }
    }

    #[test]
    fn arbitrary_bytes_roundtrip(data in prop::collection::vec(any::<u8>(), 0..1024)) {
        let mut compressed = vec![];
        let result = Encoder::new().encode_all(&data[..], &mut compressed);
        prop_assert!(result.status.is_ok());

        let mut restored = vec![];
        let result = Decoder::new().decode_all(&compressed[..], &mut restored);
        prop_assert!(result.status.is_ok());
        prop_assert_eq!(restored, data);
    }
}

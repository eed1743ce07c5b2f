use crate::utils::bitset::BitSet;

#[test]
fn bitset_set_get() {
    let mut b = BitSet::new();
    assert!(!b.get(3));
    b.set(3, true);
    b.set(64, true);
    b.set(200, true);
    assert!(b.get(3));
    assert!(b.get(64));
    assert!(b.get(200));
    assert!(!b.get(4));
    assert_eq!(b.count_ones(), 3);
    b.set(64, false);
    assert!(!b.get(64));
    assert_eq!(b.count_ones(), 2);
}

#[test]
fn bitset_ones_ascending() {
    let mut b = BitSet::with_capacity(256);
    for i in [0, 1, 63, 64, 65, 130, 255] {
        b.set(i, true);
    }
    let got: Vec<_> = b.ones().collect();
    assert_eq!(got, vec![0, 1, 63, 64, 65, 130, 255]);
}

#[test]
fn bitset_clear() {
    let mut b = BitSet::with_capacity(100);
    b.set(7, true);
    b.set(99, true);
    assert!(!b.all_zero());
    b.clear();
    assert!(b.all_zero());
    assert_eq!(b.ones().count(), 0);
}

use elastic::*;
use elastic_std::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Signal)]
enum Kind {
    Read,
    Write,
    #[encode(3)]
    Flush,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Signal)]
#[width(4)]
enum Wide {
    Only,
}

#[derive(Debug, Clone, PartialEq, Eq, Signal)]
struct Beat {
    kind: Kind,
    addr: u16,
    last: bool,
}

#[test]
fn derived_widths() {
    assert_eq!(Kind::WIDTH, 2);
    assert_eq!(Wide::WIDTH, 4);
    assert_eq!(Beat::WIDTH, 19);
}

#[test]
fn enum_encoding() {
    assert_eq!(Kind::Write.transl(), vec![true, false]);
    assert_eq!(Kind::Flush.into_bits().to_u64(), Some(3));
    assert_eq!(Kind::from_transl(&[false, true]), None);
    assert_eq!(Kind::from_transl(&[true, true]), Some(Kind::Flush));
    assert_eq!(Wide::Only.into_bits(), Bits::zero(4));
}

#[test]
fn struct_fields_are_lsb_first() {
    let beat = Beat { kind: Kind::Write, addr: 0x1234, last: true };
    let bits = beat.clone().into_bits();
    assert_eq!(bits.to_u64(), Some((1 << 18) | (0x1234 << 2) | 1));
    assert_eq!(Beat::from_bits(&bits), Some(beat));
    assert_eq!(Beat::from_transl(&[false; 18]), None);
}

#[test]
fn derived_payload_passes_through_register() {
    let mut sim = Simulator::new(HandshakeRegister::for_signal::<Beat>().unwrap());
    assert_eq!(sim.machine().data_width(), 19);

    let beats = [
        Beat { kind: Kind::Read, addr: 0x10, last: false },
        Beat { kind: Kind::Flush, addr: 0xffff, last: true },
    ];
    let mut received = vec![];
    for beat in beats.iter().cloned().map(Some).chain([None, None]) {
        let cycle = sim.tick(beat.map(Signal::into_bits).into(), Ready::new(true));
        received.extend(cycle.delivered().and_then(Beat::from_bits));
    }
    assert_eq!(received, beats);
}

#![expect(missing_docs)]

use core::fmt::{self, Write};

use utf8modem::{ByteHandler, Utf8Decoder, code_point_2, code_point_3, code_point_4};

#[derive(Default)]
struct Render(String);

impl Render {
    fn continuation(&mut self, consumed: &[u8], next: Option<u8>) -> fmt::Result {
        match next {
            Some(byte) => writeln!(self.0, "continuation-error {consumed:02X?} next {byte:02X}"),
            None => writeln!(self.0, "continuation-error {consumed:02X?} next EOF"),
        }
    }
}

impl ByteHandler for Render {
    type Error = fmt::Error;

    fn handle_ascii(&mut self, b1: u8) -> fmt::Result {
        writeln!(self.0, "ascii {b1:02X}")
    }

    fn handle_2_bytes(&mut self, b1: u8, b2: u8) -> fmt::Result {
        writeln!(self.0, "two {b1:02X} {b2:02X} U+{:04X}", code_point_2(b1, b2))
    }

    fn handle_3_bytes(&mut self, b1: u8, b2: u8, b3: u8) -> fmt::Result {
        let cp = code_point_3(b1, b2, b3);
        writeln!(self.0, "three {b1:02X} {b2:02X} {b3:02X} U+{cp:04X}")
    }

    fn handle_4_bytes(&mut self, b1: u8, b2: u8, b3: u8, b4: u8) -> fmt::Result {
        let cp = code_point_4(b1, b2, b3, b4);
        writeln!(self.0, "four {b1:02X} {b2:02X} {b3:02X} {b4:02X} U+{cp:04X}")
    }

    fn handle_prefix_error(&mut self, b1: u8) -> fmt::Result {
        writeln!(self.0, "prefix-error {b1:02X}")
    }

    fn handle_continuation_error_1(&mut self, b1: u8, next: Option<u8>) -> fmt::Result {
        self.continuation(&[b1], next)
    }

    fn handle_continuation_error_2(&mut self, b1: u8, b2: u8, next: Option<u8>) -> fmt::Result {
        self.continuation(&[b1, b2], next)
    }

    fn handle_continuation_error_3(
        &mut self,
        b1: u8,
        b2: u8,
        b3: u8,
        next: Option<u8>,
    ) -> fmt::Result {
        self.continuation(&[b1, b2, b3], next)
    }

    fn handle_ignored_byte(&mut self, b: u8) -> fmt::Result {
        writeln!(self.0, "ignored {b:02X}")
    }
}

fn render(chunks: &[&[u8]]) -> String {
    let mut decoder = Utf8Decoder::new(Render::default());
    for chunk in chunks {
        decoder.feed(chunk).unwrap();
        let state = decoder.state();
        writeln!(decoder.handler_mut().0, "== {state:?}").unwrap();
    }
    let mut render = decoder.finish().unwrap();
    render.0.push_str("== finish\n");
    render.0
}

#[test]
fn snapshot_valid_sequences_split_across_chunks() {
    let chunks: [&[u8]; 3] = [b"a\xE2\x82", b"\xACb\xF0\x9F", b"\x98\x80"];
    insta::assert_snapshot!(render(&chunks), @r"
    ascii 61
    == Incomplete([E2, 82])
    three E2 82 AC U+20AC
    ascii 62
    == Incomplete([F0, 9F])
    four F0 9F 98 80 U+1F600
    == Complete(U+1F600)
    == finish
    ");
}

#[test]
fn snapshot_malformed_sequences_split_across_chunks() {
    let chunks: [&[u8]; 3] = [b"\xED\xA0", b"\x80\xC0", b"\xE2"];
    insta::assert_snapshot!(render(&chunks), @r"
    continuation-error [ED] next A0
    ignored A0
    == SurrogatePrefix
    ignored 80
    prefix-error C0
    == Error
    == Incomplete([E2])
    continuation-error [E2] next EOF
    == finish
    ");
}

#[test]
fn snapshot_two_byte_and_interrupted_sequences() {
    let chunks: [&[u8]; 2] = [b"\xC3\xA9\xE2\x82", b"A\xF4\x90"];
    insta::assert_snapshot!(render(&chunks), @r"
    two C3 A9 U+00E9
    == Incomplete([E2, 82])
    continuation-error [E2, 82] next 41
    ascii 41
    continuation-error [F4] next 90
    prefix-error 90
    == Error
    == finish
    ");
}

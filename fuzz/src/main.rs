use afl::*;

use h265_parser::{BitstreamParser, ParserState};

fn main() {
    fuzz!(|data: &[u8]| {
        let mut state = ParserState::new();

        for _result in BitstreamParser::parse(data, &mut state) {
            // do nothing, just make sure nothing panics
        }
    })
}

#[cfg(test)]
mod reader_tests {
    use std::io::BufReader;

    use tinyc::reader::LineReader;
    use tinyc::token::Position;

    fn drain(reader: &mut LineReader<impl std::io::BufRead>) -> Vec<u8> {
        let mut out = Vec::new();

        while let Some(b) = reader.advance().unwrap() {
            out.push(b);
        }

        out
    }

    #[test]
    fn test_bytes_pass_through_unchanged() {
        let source = b"ab\n\xffc\r\n".to_vec();
        let mut reader = LineReader::from_bytes(source.clone());

        assert_eq!(drain(&mut reader), source);
        assert_eq!(reader.advance().unwrap(), None);
        assert_eq!(reader.peek().unwrap(), None);
    }

    #[test]
    fn test_positions_follow_lines() {
        let mut reader = LineReader::from_bytes(b"ab\ncd".to_vec());

        assert_eq!(reader.position(), Position::new(1, 1));
        reader.advance().unwrap();
        assert_eq!(reader.peek().unwrap(), Some(b'b'));
        assert_eq!(reader.position(), Position::new(1, 2));
        reader.advance().unwrap();
        reader.advance().unwrap(); // newline
        assert_eq!(reader.position(), Position::new(2, 1));
        assert_eq!(reader.peek().unwrap(), Some(b'c'));
        assert_eq!(reader.position(), Position::new(2, 1));
    }

    #[test]
    fn test_peek_at_stays_within_line() {
        let mut reader = LineReader::from_bytes(b"<<=\nx".to_vec());

        assert_eq!(reader.peek_at(0).unwrap(), Some(b'<'));
        assert_eq!(reader.peek_at(2).unwrap(), Some(b'='));
        assert_eq!(reader.peek_at(3).unwrap(), Some(b'\n'));
        assert_eq!(reader.peek_at(4).unwrap(), None);
    }

    #[test]
    fn test_skip_line_and_block_comment() {
        let mut reader = LineReader::from_bytes(b"skip me\n* / **/rest".to_vec());

        reader.peek().unwrap();
        reader.skip_line();
        assert!(reader.skip_block_comment().unwrap());
        assert_eq!(drain(&mut reader), b"rest".to_vec());

        let mut open = LineReader::from_bytes(b"never * closed\n".to_vec());
        assert!(!open.skip_block_comment().unwrap());
    }

    #[test]
    fn test_works_over_any_bufread() {
        let mut reader = LineReader::new(BufReader::new(&b"x\ny\n"[..]));

        assert_eq!(drain(&mut reader), b"x\ny\n".to_vec());
    }
}

#[macro_use]
mod common;

#[cfg(test)]
mod string {
    tests! {
        literals in string is OK
        "a string"
        ""
    }

    tests! {
        concat in string is OK
        "hi there"
    }

    tests! {
        multiline in string is OK
        "1"
        "2"
        "3"
    }

    tests! {
        line_counting in string is ERR(70)
        "Undefined variable 'err'."
        "[line 4]"
    }

    tests! {
        unterminated_err in string is ERR(65)
        "[line 1] Error: Unterminated String."
    }
}

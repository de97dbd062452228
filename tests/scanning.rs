#[macro_use]
mod common;

#[cfg(test)]
mod scanning {
    // A lexical error does not stop the parser from reporting its own.
    tests! {
        unexpected_character_err in scanning is ERR(65)
        "[line 1] Error: Unexpected Character."
        "[line 1] Error at ';': Expect expression."
    }
}

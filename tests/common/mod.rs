#[macro_export]
macro_rules! tests {
    ($file:ident in $scope:ident is OK $($expected:expr)*) => {
        #[test]
        fn $file() {
            use lox_lang::lox;

            // Every print line comes out newline-terminated.
            let lines: Vec<&str> = vec![$($expected),*];
            let expected: String = lines.iter().map(|line| format!("{line}\n")).collect();

            let mut output = Vec::new();
            let mut lox = lox::new(&mut output);

            lox.run_file(&format!("tests/target/{}/{}.lox", stringify!($scope), stringify!($file)));

            // lox borrows the output buffer until dropped.
            drop(lox);
            assert_eq!(expected, std::str::from_utf8(&output).unwrap());
        }
    };

    ($file:ident in $scope:ident is ERR($code:expr) $($expected:expr)+) => {
        #[test]
        fn $file() {
            use assert_cmd::Command;

            let lines: Vec<&str> = vec![$($expected),+];
            let stderr: String = lines.iter().map(|line| format!("{line}\n")).collect();

            Command::cargo_bin("lox").unwrap()
                .arg(format!("tests/target/{}/{}.lox", stringify!($scope), stringify!($file)))
                .assert()
                .stderr(stderr)
                .code($code);
        }
    };
}

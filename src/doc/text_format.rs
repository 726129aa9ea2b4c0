/*!
# The Text Format

A program is written one line at a time, each starting with a line number
between 0 and 9999 followed by at least one space. Line numbers must
increase. Keywords are written as they appear on a ZX81 screen and are not
case sensitive.

```text
10 REM THE GAME OF LIFE
20 LET A$="%H%E%L%L%O"
30 PRINT AT 10,5;A$
40 GOTO 30
```

Anything the keyboard can not type is written with an escape.

 * Block graphics use a backslash and two characters that draw the
   quadrants: `\' `, `\.:`, `\::`.
 * Inverse characters are prefixed with `%`: `%A`, `%5`, `%$`.
 * The quote inside a string is `\"`.
 * Any byte can be written as its decimal code in brackets: `[118]`.
 * Inside `REM` lines and strings a keyword must be bracketed, `[PRINT]`,
   otherwise its letters are taken one by one.

Lines starting with `#` are comments. Inside a line, `[# any text]` is
a comment that produces no bytes. A backslash at the end of a line joins
it with the next one.

A number typed in a program is stored twice: as the digits you see and as
a hidden five byte floating point value that the interpreter actually uses.
Both are produced from the digits. When a P-file holds a hidden value that
does not match its digits, the listing shows every byte as a code followed
by the value, for example `[126][132][32][0][0][0][#=10]`.

Two more escapes insert data:

```text
10 REM [!block=32]
20 REM [!include machine_code.bin]
```

The first inserts 32 zero bytes, the second the contents of a file found
relative to the source file.
*/
